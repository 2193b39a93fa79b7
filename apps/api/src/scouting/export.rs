//! List filtering and Markdown export of stored profiles.

use serde::Deserialize;

use crate::models::profile::PlayerProfile;

/// Optional, case-insensitive equality filters. Blank values are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileFilter {
    pub country: Option<String>,
    pub role: Option<String>,
    pub rank: Option<String>,
}

impl ProfileFilter {
    pub fn matches(&self, profile: &PlayerProfile) -> bool {
        field_matches(self.country.as_deref(), &profile.country)
            && field_matches(self.role.as_deref(), &profile.role)
            && field_matches(self.rank.as_deref(), profile.rank.as_str())
    }
}

fn field_matches(wanted: Option<&str>, actual: &str) -> bool {
    match wanted.map(str::trim) {
        None | Some("") => true,
        Some(w) => w.to_lowercase() == actual.to_lowercase(),
    }
}

pub fn filter_profiles<'a>(
    profiles: &'a [PlayerProfile],
    filter: &ProfileFilter,
) -> Vec<&'a PlayerProfile> {
    profiles.iter().filter(|p| filter.matches(p)).collect()
}

/// Renders profiles as a Markdown document, one section per profile.
pub fn to_markdown(profiles: &[PlayerProfile]) -> String {
    profiles
        .iter()
        .map(profile_section)
        .collect::<Vec<_>>()
        .join("\n")
}

fn profile_section(p: &PlayerProfile) -> String {
    let mut lines = vec![
        format!("### {} ({}, {})", p.name, p.country, p.birth_year),
        format!("- **Role**: {}", p.role),
        format!("- **Club**: {}", p.club.as_deref().unwrap_or("N/A")),
    ];
    if let Some(video) = &p.video {
        lines.push(format!("- **Video**: [Watch]({video})"));
    }
    if let Some(context) = &p.context {
        lines.push(format!("- **Context**: {context}"));
    }
    lines.push(format!("- **Tags**: {}", p.tags.join(", ")));
    lines.push(format!("- **Source**: {}", p.source));
    lines.push(format!("- **Rank**: {}", p.rank));
    lines.push(format!("- **Insight**: {}", p.insight));

    let mut section = lines.join("\n");
    section.push('\n');
    section
}
