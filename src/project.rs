//! Project manifest for the packaging step
//!
//! Flattens a translated module tree into the list of module texts a VBA
//! project is assembled from, plus the runtime references the generated code
//! needs.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::emitter::Render;
use crate::error::Result;
use crate::vba::ProceduralModule;

/// Manifest file written next to the module files
pub const MANIFEST_FILE: &str = "project.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    /// `.bas`
    Standard,
    /// `.cls`
    Class,
}

impl ModuleKind {
    pub fn extension(&self) -> &'static str {
        match self {
            ModuleKind::Standard => "bas",
            ModuleKind::Class => "cls",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectModule {
    pub name: String,
    pub kind: ModuleKind,
    pub text: String,
}

impl ProjectModule {
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.name, self.kind.extension())
    }
}

/// Type library reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub name: String,
    pub guid: String,
    pub major: u32,
    pub minor: u32,
}

/// Microsoft Scripting Runtime, which provides `Dictionary`
pub fn scripting_reference() -> Reference {
    Reference {
        name: "Scripting".to_string(),
        guid: "{420B2830-E718-11CF-893D-00A0C9054228}".to_string(),
        major: 1,
        minor: 0,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VbProject {
    pub modules: Vec<ProjectModule>,
    pub references: Vec<Reference>,
}

impl VbProject {
    /// Primary module, then class modules in definition order, then the
    /// constructor module
    pub fn from_module(module: &ProceduralModule) -> Self {
        let mut modules = vec![ProjectModule {
            name: module.name.clone(),
            kind: ModuleKind::Standard,
            text: module.to_code(),
        }];
        modules.extend(module.support_modules.iter().map(|class| ProjectModule {
            name: class.name.clone(),
            kind: ModuleKind::Class,
            text: class.to_code(),
        }));
        if let Some(support) = &module.class_support_module {
            modules.push(ProjectModule {
                name: support.name.clone(),
                kind: ModuleKind::Standard,
                text: support.to_code(),
            });
        }
        Self {
            modules,
            references: vec![scripting_reference()],
        }
    }

    pub fn module(&self, name: &str) -> Option<&ProjectModule> {
        self.modules.iter().find(|m| m.name == name)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Write every module as `<name>.bas` / `<name>.cls` plus the manifest;
    /// returns the written paths
    pub fn write_to_dir(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(dir)?;
        let mut written = Vec::new();
        for module in &self.modules {
            let path = dir.join(module.file_name());
            fs::write(&path, &module.text)?;
            debug!(path = %path.display(), "wrote module");
            written.push(path);
        }
        let manifest = dir.join(MANIFEST_FILE);
        fs::write(&manifest, self.to_json())?;
        written.push(manifest);
        Ok(written)
    }
}
