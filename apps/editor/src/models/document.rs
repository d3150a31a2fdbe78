//! The canonical resume document: a header plus an ordered list of typed
//! sections. Array position is the only ordering signal.

use serde::{Deserialize, Serialize};

use crate::models::inline::InlineText;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub location: String,
}

/// The fixed header fields, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderField {
    Name,
    Title,
    Phone,
    Email,
    Location,
}

impl HeaderField {
    pub const ALL: [HeaderField; 5] = [
        HeaderField::Name,
        HeaderField::Title,
        HeaderField::Phone,
        HeaderField::Email,
        HeaderField::Location,
    ];

    pub fn key(self) -> &'static str {
        match self {
            HeaderField::Name => "name",
            HeaderField::Title => "title",
            HeaderField::Phone => "phone",
            HeaderField::Email => "email",
            HeaderField::Location => "location",
        }
    }
}

impl Header {
    pub fn get(&self, field: HeaderField) -> &str {
        match field {
            HeaderField::Name => &self.name,
            HeaderField::Title => &self.title,
            HeaderField::Phone => &self.phone,
            HeaderField::Email => &self.email,
            HeaderField::Location => &self.location,
        }
    }

    pub fn set(&mut self, field: HeaderField, value: String) {
        let slot = match field {
            HeaderField::Name => &mut self.name,
            HeaderField::Title => &mut self.title,
            HeaderField::Phone => &mut self.phone,
            HeaderField::Email => &mut self.email,
            HeaderField::Location => &mut self.location,
        };
        *slot = value;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillGroup {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub items: Vec<String>,
}

/// One rich-text line: a bullet, an education entry or a generic item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineItem {
    #[serde(default)]
    pub inline: InlineText,
}

impl InlineItem {
    pub fn new(inline: InlineText) -> Self {
        Self { inline }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    #[serde(default)]
    pub role_title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    #[serde(default)]
    pub bullets: Vec<InlineItem>,
}

/// The editable plain-text fields of a role line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoleField {
    RoleTitle,
    Company,
    Start,
    End,
}

impl RoleField {
    pub const ALL: [RoleField; 4] = [
        RoleField::RoleTitle,
        RoleField::Company,
        RoleField::Start,
        RoleField::End,
    ];

    pub fn key(self) -> &'static str {
        match self {
            RoleField::RoleTitle => "roleTitle",
            RoleField::Company => "company",
            RoleField::Start => "start",
            RoleField::End => "end",
        }
    }
}

impl Role {
    pub fn get(&self, field: RoleField) -> &str {
        match field {
            RoleField::RoleTitle => &self.role_title,
            RoleField::Company => &self.company,
            RoleField::Start => &self.start,
            RoleField::End => &self.end,
        }
    }

    pub fn set(&mut self, field: RoleField, value: String) {
        let slot = match field {
            RoleField::RoleTitle => &mut self.role_title,
            RoleField::Company => &mut self.company,
            RoleField::Start => &mut self.start,
            RoleField::End => &mut self.end,
        };
        *slot = value;
    }
}

/// Section discriminant, the `type` tag on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Summary,
    Skills,
    Experience,
    Education,
    Generic,
}

impl SectionKind {
    /// Parses a wire tag; unknown tags are `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "summary" => Some(SectionKind::Summary),
            "skills" => Some(SectionKind::Skills),
            "experience" => Some(SectionKind::Experience),
            "education" => Some(SectionKind::Education),
            "generic" => Some(SectionKind::Generic),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            SectionKind::Summary => "summary",
            SectionKind::Skills => "skills",
            SectionKind::Experience => "experience",
            SectionKind::Education => "education",
            SectionKind::Generic => "generic",
        }
    }
}

/// Type-specific section payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SectionBody {
    Summary {
        #[serde(default)]
        inline: InlineText,
    },
    Skills {
        #[serde(default)]
        groups: Vec<SkillGroup>,
    },
    Experience {
        #[serde(default)]
        roles: Vec<Role>,
    },
    Education {
        #[serde(default)]
        items: Vec<InlineItem>,
    },
    Generic {
        #[serde(default)]
        items: Vec<InlineItem>,
    },
}

impl SectionBody {
    pub fn kind(&self) -> SectionKind {
        match self {
            SectionBody::Summary { .. } => SectionKind::Summary,
            SectionBody::Skills { .. } => SectionKind::Skills,
            SectionBody::Experience { .. } => SectionKind::Experience,
            SectionBody::Education { .. } => SectionKind::Education,
            SectionBody::Generic { .. } => SectionKind::Generic,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub heading: String,
    #[serde(flatten)]
    pub body: SectionBody,
}

impl Section {
    pub fn kind(&self) -> SectionKind {
        self.body.kind()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub header: Header,
    #[serde(default)]
    pub sections: Vec<Section>,
}
