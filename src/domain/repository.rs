use crate::domain::error::DomainError;
use crate::domain::model::Group;

pub type Result<T> = std::result::Result<T, DomainError>;

/// Outcome of loading the group file
#[derive(Debug, Default)]
pub struct LoadedGroups {
    pub groups: Vec<Group>,
    /// True when the file was corrupt and has been reset to empty
    pub recovered: bool,
}

/// Repository trait for the whole group mapping.
///
/// Persistence is full-file: `save_all` replaces everything previously stored.
pub trait GroupRepository: Send + Sync {
    fn load_all(&self) -> Result<LoadedGroups>;
    fn save_all(&self, groups: &[Group]) -> Result<()>;
    fn location(&self) -> String;
}

/// Repository trait for the verified token list
pub trait TokenRepository: Send + Sync {
    /// Missing or unreadable content yields an empty list, never an error
    fn load(&self) -> Vec<String>;
    fn replace_all(&self, tokens: &[String]) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

// Implement GroupRepository for Box<dyn GroupRepository> to allow dynamic dispatch
impl GroupRepository for Box<dyn GroupRepository> {
    fn load_all(&self) -> Result<LoadedGroups> {
        (**self).load_all()
    }

    fn save_all(&self, groups: &[Group]) -> Result<()> {
        (**self).save_all(groups)
    }

    fn location(&self) -> String {
        (**self).location()
    }
}

// Implement TokenRepository for Box<dyn TokenRepository> to allow dynamic dispatch
impl TokenRepository for Box<dyn TokenRepository> {
    fn load(&self) -> Vec<String> {
        (**self).load()
    }

    fn replace_all(&self, tokens: &[String]) -> Result<()> {
        (**self).replace_all(tokens)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}
