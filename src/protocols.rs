//! This module contains the table of supported protocols and the mapping
//! from a protocol hash to the storage-handling epoch ("symlink") that knows
//! how to reconcile it.

use crate::error::storage::{Error, Result};

/// The storage-handling epochs. Every supported protocol resolves to one of
/// these; a new protocol is appended to the table once it is verified to
/// behave like an existing epoch or gets an epoch of its own.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Epoch {
    /// Early protocols: big-maps are embedded inline in the storage value.
    Alpha,

    /// Babylon and later: big-maps are referenced by integer pointer.
    Babylon,
}

impl Epoch {
    /// Gets the symlink name used to key cached metadata per epoch.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Alpha => "alpha",
            Self::Babylon => "babylon",
        }
    }
}

/// The supported protocol hashes and their epochs, in activation order.
const SYM_LINKS: &[(&str, Epoch)] = &[
    ("PrihK96nBAFSxVL1GLJTVhu9YnzkMFiBeuJRPA8NwuZVZCE1L6i", Epoch::Alpha),
    ("PtBMwNZT94N7gXKw4i273CKcSaBrrBnqnt3RATExNKr9KNX2USV", Epoch::Alpha),
    ("ProtoDemoNoopsDemoNoopsDemoNoopsDemoNoopsDemo6XBoYp", Epoch::Alpha),
    ("PtYuensgYBb3G3x1hLLbCmcav8ue8Kyd2khADcL5LsT5R1hcXex", Epoch::Alpha),
    ("Ps9mPmXaRzmzk35gbAYNCAw6UXdE2qoABTHbN2oEEc1qM7CwT9P", Epoch::Alpha),
    ("PsYLVpVvgbLhAhoqAkMFUo6gudkJ9weNXhUYCiLDzcUpFpkk8Wt", Epoch::Alpha),
    ("PsddFKi32cMJ2qPjf43Qv5GDWLDPZb3T3bF6fLKiF5HtvHNU7aP", Epoch::Alpha),
    ("Pt24m4xiPbLDhVgVfABUjirbmda3yohdN82Sp9FeuAXJ4eV9otd", Epoch::Alpha),
    ("PtCJ7pwoxe8JasnHY8YonnLYjcVHmhiARPJvqcC6VfHT5s8k8sY", Epoch::Alpha),
    ("PsBabyM1eUXZseaJdmXFApDSBqj8YBfwELoxZHHW77EMcAbbwAS", Epoch::Babylon),
    ("PsBABY5HQTSkA4297zNHfsZNKtxULfL18y95qb3m53QJiXGmrbU", Epoch::Babylon),
    ("PsCARTHAGazKbHtnKfLzQg3kms52kSRpgnDY982a9oYsSXRLQEb", Epoch::Babylon),
];

/// Resolves a protocol hash to its storage-handling epoch.
///
/// # Errors
///
/// Returns [`Err`] if the protocol is not in the supported table.
pub fn epoch_for(protocol: &str) -> Result<Epoch> {
    SYM_LINKS
        .iter()
        .find(|(hash, _)| *hash == protocol)
        .map(|(_, epoch)| *epoch)
        .ok_or_else(|| Error::UnknownProtocol {
            protocol: protocol.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::{epoch_for, Epoch};

    #[test]
    fn resolves_known_protocols() -> anyhow::Result<()> {
        let babylon = epoch_for("PsBabyM1eUXZseaJdmXFApDSBqj8YBfwELoxZHHW77EMcAbbwAS")?;
        assert_eq!(babylon, Epoch::Babylon);

        let alpha = epoch_for("Pt24m4xiPbLDhVgVfABUjirbmda3yohdN82Sp9FeuAXJ4eV9otd")?;
        assert_eq!(alpha, Epoch::Alpha);
        Ok(())
    }

    #[test]
    fn rejects_unknown_protocols() {
        assert!(epoch_for("PsNotARealProtocolHash").is_err());
    }
}
