//! Participants of a carpool request.

use std::fmt;

use super::DomainError;

/// Stable identifier of a participant within one request.
///
/// Ids are assigned from the participant's position in the request, so two
/// people sharing a name remain distinct. The ordering of ids is the
/// tie-break order used throughout matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParticipantId(pub usize);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A person travelling to the shared destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    /// Postal address of the starting point, as typed by the user.
    pub address: String,
    pub email: String,
    pub phone: String,
}

impl Participant {
    /// Create a participant, rejecting a blank address.
    ///
    /// The address is trimmed; the other fields are kept as given.
    pub fn new(
        id: ParticipantId,
        name: impl Into<String>,
        address: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let address = address.into().trim().to_string();
        if address.is_empty() {
            return Err(DomainError::BlankField("address"));
        }

        Ok(Self {
            id,
            name: name.into(),
            address,
            email: email.into(),
            phone: phone.into(),
        })
    }
}
