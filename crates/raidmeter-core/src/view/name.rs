use crate::types::{NameError, PlayerName};

///
/// NameGate
///
/// First screen of a session. The dashboard stays closed until a valid
/// name has been accepted; the accepted name is then fixed for the session.
///

#[derive(Clone, Debug, Default)]
pub struct NameGate {
    accepted: Option<PlayerName>,
}

impl NameGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Trim and check `raw`; on success the gate opens.
    pub fn submit(&mut self, raw: &str) -> Result<PlayerName, NameError> {
        let name = PlayerName::parse(raw)?;
        self.accepted = Some(name.clone());

        Ok(name)
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.accepted.is_some()
    }

    #[must_use]
    pub const fn name(&self) -> Option<&PlayerName> {
        self.accepted.as_ref()
    }
}

///
/// TESTS
///
