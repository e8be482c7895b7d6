//! Popup forms: export metadata and the options page.

use checkit_core::{CheckitResult, TextField};
use checkit_domain::ExportMetadata;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportField {
    Name,
    Title,
    Notes,
    Link,
}

impl ExportField {
    const ORDER: [ExportField; 4] = [Self::Name, Self::Title, Self::Notes, Self::Link];

    fn step(self, delta: isize) -> Self {
        let index = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0) as isize;
        let next = (index + delta).rem_euclid(Self::ORDER.len() as isize);
        Self::ORDER[next as usize]
    }
}

/// Export form. The name comes from the configured display name and is locked.
#[derive(Debug, Clone)]
pub struct ExportForm {
    pub name: TextField,
    pub title: TextField,
    pub notes: TextField,
    pub link: TextField,
    pub focus: ExportField,
}

impl ExportForm {
    pub fn new(user_name: Option<&str>) -> Self {
        Self {
            name: TextField::locked(user_name.unwrap_or("")),
            title: TextField::new(),
            notes: TextField::new(),
            link: TextField::new(),
            focus: ExportField::Title,
        }
    }

    pub fn next_field(&mut self) {
        self.focus = self.focus.step(1);
    }

    pub fn prev_field(&mut self) {
        self.focus = self.focus.step(-1);
    }

    pub fn focused_mut(&mut self) -> &mut TextField {
        match self.focus {
            ExportField::Name => &mut self.name,
            ExportField::Title => &mut self.title,
            ExportField::Notes => &mut self.notes,
            ExportField::Link => &mut self.link,
        }
    }

    pub fn fields(&self) -> [(&'static str, &TextField, bool); 4] {
        [
            ("Name", &self.name, self.focus == ExportField::Name),
            ("Business title *", &self.title, self.focus == ExportField::Title),
            ("Notes", &self.notes, self.focus == ExportField::Notes),
            ("Link (URL)", &self.link, self.focus == ExportField::Link),
        ]
    }

    /// Collects and validates the metadata.
    pub fn metadata(&self) -> CheckitResult<ExportMetadata> {
        let metadata = ExportMetadata {
            name: self.name.value(),
            title: self.title.value(),
            notes: self.notes.value(),
            link: self.link.value(),
        };
        metadata.validate()?;
        Ok(metadata)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionsField {
    DeploymentId,
    UserName,
}

/// The options page: deployment id and display name.
#[derive(Debug, Clone)]
pub struct OptionsForm {
    pub deployment_id: TextField,
    pub user_name: TextField,
    pub focus: OptionsField,
}

impl OptionsForm {
    pub fn new(deployment_id: Option<&str>, user_name: Option<&str>) -> Self {
        Self {
            deployment_id: TextField::with_text(deployment_id.unwrap_or("")),
            user_name: TextField::with_text(user_name.unwrap_or("")),
            focus: OptionsField::DeploymentId,
        }
    }

    pub fn toggle_field(&mut self) {
        self.focus = match self.focus {
            OptionsField::DeploymentId => OptionsField::UserName,
            OptionsField::UserName => OptionsField::DeploymentId,
        };
    }

    pub fn focused_mut(&mut self) -> &mut TextField {
        match self.focus {
            OptionsField::DeploymentId => &mut self.deployment_id,
            OptionsField::UserName => &mut self.user_name,
        }
    }

    pub fn fields(&self) -> [(&'static str, &TextField, bool); 2] {
        [
            (
                "Deployment ID",
                &self.deployment_id,
                self.focus == OptionsField::DeploymentId,
            ),
            (
                "Display name",
                &self.user_name,
                self.focus == OptionsField::UserName,
            ),
        ]
    }
}
