//! Profile Registry for Version Management
//!
//! Keeps named profiles with their versions so a deployment can roll a
//! tuning forward (`sitepoint_rtk_v2`) while older clients keep asking for
//! the version they were built against.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{builtin, ProfileError, QuestProfile};

/// Profile metadata for registry entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileMetadata {
    /// Profile name without version (e.g., "sitepoint_rtk")
    pub name: String,

    /// Version number (`_v2` suffix gives 2; unsuffixed names are 1)
    pub version: u32,

    /// Full qualified name (e.g., "sitepoint_rtk_v2")
    pub qualified_name: String,

    /// Whether this profile is deprecated
    pub deprecated: bool,

    /// Replacement profile if deprecated
    pub replacement: Option<String>,
}

impl ProfileMetadata {
    /// Split a qualified name into base name and version
    pub fn parse(qualified_name: &str) -> Self {
        let (name, version) = match qualified_name.rfind("_v") {
            Some(pos) => match qualified_name[pos + 2..].parse::<u32>() {
                Ok(version) => (&qualified_name[..pos], version),
                Err(_) => (qualified_name, 1),
            },
            None => (qualified_name, 1),
        };

        Self {
            name: name.to_string(),
            version,
            qualified_name: qualified_name.to_string(),
            deprecated: false,
            replacement: None,
        }
    }
}

/// Thread-safe profile registry with version management
pub struct ProfileRegistry {
    /// Profiles indexed by qualified name
    profiles: RwLock<HashMap<String, (QuestProfile, ProfileMetadata)>>,

    /// Latest version for each base name
    latest: RwLock<HashMap<String, (u32, String)>>,
}

impl ProfileRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            profiles: RwLock::new(HashMap::new()),
            latest: RwLock::new(HashMap::new()),
        }
    }

    /// Register a profile under its own name
    ///
    /// The profile must build a valid configuration; a profile the engine
    /// would refuse never enters the registry.
    pub fn register(&self, profile: QuestProfile) -> Result<(), ProfileError> {
        profile.into_config()?;

        let metadata = ProfileMetadata::parse(&profile.name);
        let qualified = metadata.qualified_name.clone();
        let base = metadata.name.clone();
        let version = metadata.version;

        self.write_profiles()?.insert(qualified.clone(), (profile, metadata));

        let mut latest = self.write_latest()?;
        let newer = latest.get(&base).map_or(true, |(current, _)| version >= *current);
        if newer {
            latest.insert(base, (version, qualified.clone()));
        }

        log::info!("registered quest profile {}", qualified);
        Ok(())
    }

    /// Parse and register a JSON document
    pub fn register_json(&self, json: &str) -> Result<(), ProfileError> {
        self.register(QuestProfile::from_json(json)?)
    }

    /// Get a profile by qualified name
    pub fn get(&self, name: &str) -> Result<QuestProfile, ProfileError> {
        self.read_profiles()?
            .get(name)
            .map(|(profile, _)| profile.clone())
            .ok_or_else(|| ProfileError::NotFound(name.to_string()))
    }

    /// Get the highest version registered under a base name
    pub fn get_latest(&self, base_name: &str) -> Result<QuestProfile, ProfileError> {
        let qualified = self
            .read_latest()?
            .get(base_name)
            .map(|(_, qualified)| qualified.clone())
            .ok_or_else(|| ProfileError::NotFound(base_name.to_string()))?;
        self.get(&qualified)
    }

    /// Versions registered under a base name, ascending
    pub fn get_versions(&self, base_name: &str) -> Result<Vec<u32>, ProfileError> {
        let mut versions: Vec<u32> = self
            .read_profiles()?
            .values()
            .filter(|(_, meta)| meta.name == base_name)
            .map(|(_, meta)| meta.version)
            .collect();
        versions.sort_unstable();
        Ok(versions)
    }

    /// Get metadata by qualified name
    pub fn get_metadata(&self, name: &str) -> Result<ProfileMetadata, ProfileError> {
        self.read_profiles()?
            .get(name)
            .map(|(_, meta)| meta.clone())
            .ok_or_else(|| ProfileError::NotFound(name.to_string()))
    }

    /// Mark a profile deprecated, optionally naming its replacement
    pub fn deprecate(&self, name: &str, replacement: Option<&str>) -> Result<(), ProfileError> {
        let mut profiles = self.write_profiles()?;
        let (_, meta) = profiles
            .get_mut(name)
            .ok_or_else(|| ProfileError::NotFound(name.to_string()))?;

        meta.deprecated = true;
        meta.replacement = replacement.map(str::to_string);
        log::info!("deprecated quest profile {}", name);
        Ok(())
    }

    /// Qualified names of every registered profile, sorted
    pub fn names(&self) -> Result<Vec<String>, ProfileError> {
        let mut names: Vec<String> = self.read_profiles()?.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    /// Load all built-in profiles
    pub fn load_defaults(&self) -> Result<(), ProfileError> {
        for json in builtin::ALL {
            self.register_json(json)?;
        }
        log::info!("loaded {} built-in quest profiles", builtin::ALL.len());
        Ok(())
    }

    fn read_profiles(
        &self,
    ) -> Result<RwLockReadGuard<'_, HashMap<String, (QuestProfile, ProfileMetadata)>>, ProfileError> {
        self.profiles.read().map_err(|_| ProfileError::Poisoned)
    }

    fn write_profiles(
        &self,
    ) -> Result<RwLockWriteGuard<'_, HashMap<String, (QuestProfile, ProfileMetadata)>>, ProfileError> {
        self.profiles.write().map_err(|_| ProfileError::Poisoned)
    }

    fn read_latest(&self) -> Result<RwLockReadGuard<'_, HashMap<String, (u32, String)>>, ProfileError> {
        self.latest.read().map_err(|_| ProfileError::Poisoned)
    }

    fn write_latest(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, (u32, String)>>, ProfileError> {
        self.latest.write().map_err(|_| ProfileError::Poisoned)
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::new()
    }
}
