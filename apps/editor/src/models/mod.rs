pub mod document;
pub mod inline;
pub mod intake;

pub use document::{
    Document, Header, HeaderField, InlineItem, Role, RoleField, Section, SectionBody, SectionKind,
    SkillGroup,
};
pub use inline::{normalize, InlineText, Run};
