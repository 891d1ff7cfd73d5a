//! Capstone project document schema.

use serde::{Deserialize, Serialize};

use crate::tree::FileTree;

/// The authoring request a capstone project is generated from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRequest {
    /// Subject matter of the project (e.g. "a URL shortener service").
    pub topic: String,
    /// Intended audience.
    #[serde(default)]
    pub audience: Option<String>,
}

/// One project milestone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    /// Short milestone title.
    pub title: String,
    /// What completing the milestone involves.
    pub description: String,
}

/// The brief part of a project: everything except the file environment.
///
/// Produced by a single producer call before the environment session runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectBrief {
    /// What the project is and why it is worth building.
    #[serde(default)]
    pub overview: String,
    /// Skills the learner practices along the way.
    #[serde(default)]
    pub learning_goals: String,
    /// Suggested milestones, in order.
    #[serde(default)]
    pub milestones: Vec<Milestone>,
}

/// A complete capstone project: the brief plus its generated starter
/// environment (file tree).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectSpec {
    /// What the project is and why it is worth building.
    #[serde(default)]
    pub overview: String,
    /// Skills the learner practices along the way.
    #[serde(default)]
    pub learning_goals: String,
    /// Suggested milestones, in order.
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    /// Starter project file tree.
    #[serde(default)]
    pub environment: FileTree,
}

impl ProjectSpec {
    /// Builds a project from its brief, with an empty environment.
    #[must_use]
    pub fn from_brief(brief: ProjectBrief) -> Self {
        Self {
            overview: brief.overview,
            learning_goals: brief.learning_goals,
            milestones: brief.milestones,
            environment: FileTree::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_brief_copies_fields_and_leaves_tree_empty() {
        let brief = ProjectBrief {
            overview: "Build a key-value store".into(),
            learning_goals: "File formats, hashing".into(),
            milestones: vec![Milestone {
                title: "In-memory store".into(),
                description: "Get/set over a hash map".into(),
            }],
        };
        let spec = ProjectSpec::from_brief(brief.clone());
        assert_eq!(spec.overview, brief.overview);
        assert_eq!(spec.milestones, brief.milestones);
        assert!(spec.environment.list_file_paths().is_empty());
    }

    #[test]
    fn project_yaml_round_trip() {
        let spec = ProjectSpec {
            overview: "o".into(),
            learning_goals: "g".into(),
            milestones: vec![],
            environment: FileTree::default(),
        };
        let yaml = serde_yaml::to_string(&spec).unwrap();
        let back: ProjectSpec = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(spec, back);
    }
}
