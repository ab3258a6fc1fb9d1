use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use workforce_core::{DomainError, DomainResult, EmploymentCode, Entity, ValueObject};

/// Project identifier (assigned by storage on insert).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub i64);

impl core::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl core::str::FromStr for ProjectId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(ProjectId)
            .map_err(|e| DomainError::invalid_id(format!("ProjectId: {e}")))
    }
}

/// Project status lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Pending => "pending",
            ProjectStatus::InProgress => "in-progress",
            ProjectStatus::Completed => "completed",
        }
    }
}

impl core::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for ProjectStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ProjectStatus::Pending),
            "in-progress" | "in_progress" => Ok(ProjectStatus::InProgress),
            "completed" => Ok(ProjectStatus::Completed),
            other => Err(DomainError::validation(format!(
                "status `{other}` must be one of: pending, in-progress, completed"
            ))),
        }
    }
}

/// Completion percentage, 0..=100.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Progress(u8);

impl ValueObject for Progress {}

impl Progress {
    pub const MAX: u8 = 100;

    pub fn new(value: i32) -> DomainResult<Self> {
        if !(0..=i32::from(Self::MAX)).contains(&value) {
            return Err(DomainError::validation(format!(
                "progress {value} is out of range (0..=100)"
            )));
        }
        Ok(Self(value as u8))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i32> for Progress {
    type Error = DomainError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Progress> for i32 {
    fn from(value: Progress) -> Self {
        i32::from(value.0)
    }
}

/// Project fields, without its assignment edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub deadline: Option<NaiveDate>,
    pub progress: Progress,
}

impl Entity for Project {
    type Id = ProjectId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// A project together with the identity keys of its assigned employees.
///
/// Member order is whatever storage returned; compare as sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectView {
    #[serde(flatten)]
    pub project: Project,
    pub assigned_employee_ids: Vec<EmploymentCode>,
}

impl ProjectView {
    pub fn has_member(&self, code: &EmploymentCode) -> bool {
        self.assigned_employee_ids.contains(code)
    }
}

/// Intake for a new project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProject {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub progress: Progress,
    #[serde(default)]
    pub member_keys: Vec<EmploymentCode>,
}

impl NewProject {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: ProjectStatus::Pending,
            deadline: None,
            progress: Progress::default(),
            member_keys: Vec::new(),
        }
    }

    pub fn with_members(mut self, members: impl IntoIterator<Item = EmploymentCode>) -> Self {
        self.member_keys.extend(members);
        self
    }

    /// Collapse repeated member keys, keeping first-seen order.
    ///
    /// Every `ProjectGraph` backend applies this before writing edges, so the
    /// edge set holds each (project, member) pair once.
    pub fn with_distinct_members(mut self) -> Self {
        let mut member_keys: Vec<EmploymentCode> = Vec::with_capacity(self.member_keys.len());
        for key in self.member_keys {
            if !member_keys.contains(&key) {
                member_keys.push(key);
            }
        }
        self.member_keys = member_keys;
        self
    }

    /// Validate required fields; repeated member keys collapse to one edge.
    pub fn validated(self) -> DomainResult<Self> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(DomainError::validation("title cannot be empty"));
        }

        let description = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        Ok(Self {
            title,
            description,
            ..self.with_distinct_members()
        })
    }
}

/// Outcome of project creation.
///
/// Unknown member keys do not fail the call; they are left out of the edge set
/// and listed in `dropped_member_keys`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedProject {
    pub project: ProjectView,
    pub dropped_member_keys: Vec<EmploymentCode>,
}
