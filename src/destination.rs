// SPDX-License-Identifier: GPL-3.0-only

//! Output destinations a capture can be written to

use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a captured image is persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DestinationSelection {
    /// Fixed file in the app's private storage
    #[default]
    LocalFile,
    /// Shared, externally indexed media collection
    MediaLibrary,
    /// Private file shared through a provider URI
    ProviderUri,
    /// Uniquely named file in the app's cache
    TemporaryFile,
}

impl DestinationSelection {
    /// All variants in picker order
    pub const ALL: [DestinationSelection; 4] = [
        DestinationSelection::LocalFile,
        DestinationSelection::MediaLibrary,
        DestinationSelection::ProviderUri,
        DestinationSelection::TemporaryFile,
    ];

    /// Label shown next to the radio button
    pub fn label(&self) -> &'static str {
        match self {
            DestinationSelection::LocalFile => "Save to File",
            DestinationSelection::MediaLibrary => "Save to MediaStore",
            DestinationSelection::ProviderUri => "Save to URI",
            DestinationSelection::TemporaryFile => "Save to Temporary File",
        }
    }

    /// Position in the picker, as reported by a radio group
    pub fn index(&self) -> usize {
        match self {
            DestinationSelection::LocalFile => 0,
            DestinationSelection::MediaLibrary => 1,
            DestinationSelection::ProviderUri => 2,
            DestinationSelection::TemporaryFile => 3,
        }
    }

    /// Command-line name
    pub fn cli_name(&self) -> &'static str {
        match self {
            DestinationSelection::LocalFile => "local-file",
            DestinationSelection::MediaLibrary => "media-library",
            DestinationSelection::ProviderUri => "provider-uri",
            DestinationSelection::TemporaryFile => "temporary-file",
        }
    }

    /// Whether captures get a fresh name instead of the fixed one
    pub fn uses_unique_name(&self) -> bool {
        matches!(self, DestinationSelection::TemporaryFile)
    }
}

impl TryFrom<usize> for DestinationSelection {
    type Error = AppError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or_else(|| AppError::Configuration(format!("Unexpected destination: {}", index)))
    }
}

impl FromStr for DestinationSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.cli_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let known: Vec<_> = Self::ALL.iter().map(|d| d.cli_name()).collect();
                format!("unknown destination '{}' (expected one of {})", s, known.join(", "))
            })
    }
}

impl fmt::Display for DestinationSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cli_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_local_file() {
        assert_eq!(DestinationSelection::default(), DestinationSelection::LocalFile);
    }

    #[test]
    fn index_matches_picker_order() {
        for (i, destination) in DestinationSelection::ALL.iter().enumerate() {
            assert_eq!(destination.index(), i);
            assert_eq!(DestinationSelection::try_from(i).unwrap(), *destination);
        }
    }

    #[test]
    fn unmapped_index_is_a_configuration_error() {
        let err = DestinationSelection::try_from(7).unwrap_err();
        assert!(matches!(err, AppError::Configuration(msg) if msg.contains('7')));
    }

    #[test]
    fn parses_cli_names() {
        assert_eq!(
            "media-library".parse::<DestinationSelection>().unwrap(),
            DestinationSelection::MediaLibrary
        );
        assert_eq!(
            "Temporary-File".parse::<DestinationSelection>().unwrap(),
            DestinationSelection::TemporaryFile
        );
        assert!("cloud".parse::<DestinationSelection>().is_err());
    }

    #[test]
    fn only_temporary_files_are_uniquely_named() {
        let unique: Vec<_> = DestinationSelection::ALL
            .into_iter()
            .filter(|d| d.uses_unique_name())
            .collect();
        assert_eq!(unique, vec![DestinationSelection::TemporaryFile]);
    }
}
