//! VBA modules
use serde::{Deserialize, Serialize};

use super::nodes::{Declaration, Procedure};
use crate::semantic::VbType;

/// Verbatim helpers backing list and dict literals
pub const COLLECTION_LITERAL_HELPERS: &str = r#"Public Function NewCollection(ParamArray params() As Variant) As Collection
    Dim p As Variant

    Set NewCollection = New Collection
    For Each p In params
        NewCollection.Add p
    Next p
End Function

Public Function NewDictionary(ParamArray params() As Variant) As Dictionary
    Dim i As Integer

    Debug.Assert (UBound(params) + 1) Mod 2 = 0
    Set NewDictionary = New Dictionary
    For i = LBound(params) To UBound(params) Step 2
        NewDictionary.Add params(i), params(i + 1)
    Next i
End Function"#;

/// Suffix of the module holding class constructors
pub const CLASS_SUPPORT_SUFFIX: &str = "cls_support";

/// Standard (`.bas`) module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProceduralModule {
    pub name: String,
    pub declarations: Vec<Declaration>,
    pub code: Vec<Procedure>,
    /// Verbatim text appended after the procedures
    pub raw_code: Vec<String>,
    /// Class modules, in definition order
    pub support_modules: Vec<ClassModule>,
    /// Constructor module, created with the first constructor
    pub class_support_module: Option<Box<ProceduralModule>>,
}

impl ProceduralModule {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            declarations: Vec::new(),
            code: Vec::new(),
            raw_code: Vec::new(),
            support_modules: Vec::new(),
            class_support_module: None,
        }
    }

    pub fn procedure(&self, name: &str) -> Option<&Procedure> {
        self.code.iter().find(|p| p.name == name)
    }

    /// Constructor module, created on first use
    pub fn class_support_mut(&mut self) -> &mut ProceduralModule {
        let name = format!("{}{}", self.name, CLASS_SUPPORT_SUFFIX);
        self.class_support_module
            .get_or_insert_with(|| Box::new(ProceduralModule::new(&name)))
    }
}

/// Class (`.cls`) module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassModule {
    pub name: String,
    pub declarations: Vec<Declaration>,
    pub code: Vec<Procedure>,
}

impl ClassModule {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            declarations: Vec::new(),
            code: Vec::new(),
        }
    }

    pub fn vb_type(&self) -> VbType {
        VbType::reference(&self.name)
    }

    pub fn procedure(&self, name: &str) -> Option<&Procedure> {
        self.code.iter().find(|p| p.name == name)
    }
}
