//! Registry identifiers.
//!
//! Identifiers are plain dotted strings shared with the host platform:
//! `<namespace>.<family>.<physicalDeviceId>_<unitCode>` for channels and
//! `<channelId>.<command>` for the states below them. They are derived, never
//! generated, so the same physical device maps to the same entry regardless
//! of discovery order or process restarts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Namespaced identifier of a registry entry or host object.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistryId(String);

impl RegistryId {
    /// Derive the channel id of a physical device.
    ///
    /// Dots and whitespace inside a component are replaced with `_` so the
    /// result always splits back into the same components.
    #[must_use]
    pub fn for_device(namespace: &str, family: &str, physical_id: &str, unit_code: u8) -> Self {
        Self(format!(
            "{namespace}.{}.{}_{unit_code}",
            sanitize(family),
            sanitize(physical_id)
        ))
    }

    /// Identifier of a namespace-level state such as `info.connection`.
    #[must_use]
    pub fn for_namespace_state(namespace: &str, state: &str) -> Self {
        Self(format!("{namespace}.{state}"))
    }

    /// Identifier of the state `command` below this channel.
    #[must_use]
    pub fn child(&self, command: &str) -> Self {
        Self(format!("{}.{}", self.0, sanitize(command)))
    }

    /// Split a state id into its channel id and trailing command name.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NotAStateId`] when the id has no dot or an
    /// empty trailing segment.
    pub fn split_state(&self) -> Result<(Self, &str), ValidationError> {
        match self.0.rsplit_once('.') {
            Some((channel, command)) if !channel.is_empty() && !command.is_empty() => {
                Ok((Self(channel.to_string()), command))
            }
            _ => Err(ValidationError::NotAStateId(self.0.clone())),
        }
    }

    /// Whether this id lives below `prefix` (`prefix` itself excluded).
    #[must_use]
    pub fn is_within(&self, prefix: &str) -> bool {
        self.0
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('.') || prefix.ends_with('.'))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn sanitize(component: &str) -> String {
    component
        .trim()
        .chars()
        .map(|c| if c == '.' || c.is_whitespace() { '_' } else { c })
        .collect()
}

impl fmt::Display for RegistryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RegistryId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(ValidationError::EmptyIdentifier);
        }
        Ok(Self(s.to_string()))
    }
}
