use menuboard_core::EstablishmentId;

/// Establishment a gated request operates on.
///
/// Inserted by the subscription gate once the establishment has been found and
/// is entitled; handlers behind the gate can rely on it being present.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EstablishmentContext {
    establishment_id: EstablishmentId,
}

impl EstablishmentContext {
    pub fn new(establishment_id: EstablishmentId) -> Self {
        Self { establishment_id }
    }

    pub fn establishment_id(&self) -> EstablishmentId {
        self.establishment_id
    }
}
