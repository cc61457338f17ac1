//! Skill selection set
//!
//! Tracks which of the analysis's missing skills the user has chosen to
//! address. Membership is constrained to the current missing-skill list,
//! and a new analysis rebuilds the set empty.

/// Ordered set of missing skills selected for enhancement.
///
/// Selection order is check order; duplicates are never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillSelection {
    missing: Vec<String>,
    selected: Vec<String>,
}

impl SkillSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the allowed skill universe, clearing any prior selection.
    /// Called whenever a new analysis result supersedes the previous one.
    pub fn reset(&mut self, missing_skills: &[String]) {
        self.missing = missing_skills.to_vec();
        self.selected.clear();
    }

    /// Check or uncheck a skill.
    ///
    /// Checking a skill outside the current missing-skill list, or one that
    /// is already selected, is a no-op; so is unchecking an absent one.
    pub fn toggle(&mut self, skill: &str, checked: bool) {
        if checked {
            let allowed = self.missing.iter().any(|s| s == skill);
            let present = self.selected.iter().any(|s| s == skill);
            if allowed && !present {
                self.selected.push(skill.to_string());
            }
        } else {
            self.selected.retain(|s| s != skill);
        }
    }

    pub fn is_selected(&self, skill: &str) -> bool {
        self.selected.iter().any(|s| s == skill)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Selected skills in check order.
    pub fn selected(&self) -> &[String] {
        &self.selected
    }
}
