//! Findings: what a rule reports and how it serializes for the reporting
//! collaborator.
//!
//! A finding's description is an ordered sequence of fragments: plain text
//! interleaved with references to source elements. The serialized shape
//! (`check`, `description`, `elements[].source_mapping`, …) is the uniform
//! format the external reporter consumes.

use crate::core::severity::{Confidence, Impact};
use crate::ir::{Contract, Function, FunctionKind, Node, PragmaDirective, SourceMapping, StateVariable};
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Contract,
    Function,
    Modifier,
    Node,
    Variable,
    Pragma,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParentRef {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeSpecificFields {
    pub parent: ParentRef,
}

/// A reference to one source element inside a finding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceElement {
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub name: String,
    pub source_mapping: SourceMapping,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_specific_fields: Option<TypeSpecificFields>,
}

impl SourceElement {
    fn with_parent(kind: ElementKind, name: String, mapping: SourceMapping, parent: &str) -> Self {
        Self {
            kind,
            name,
            source_mapping: mapping,
            type_specific_fields: Some(TypeSpecificFields {
                parent: ParentRef {
                    name: parent.to_string(),
                },
            }),
        }
    }

    pub fn from_contract(contract: &Contract) -> Self {
        Self {
            kind: ElementKind::Contract,
            name: contract.name.clone(),
            source_mapping: contract.location.clone(),
            type_specific_fields: None,
        }
    }

    pub fn from_function(function: &Function, contract: &Contract) -> Self {
        let kind = if function.kind == FunctionKind::Modifier {
            ElementKind::Modifier
        } else {
            ElementKind::Function
        };
        Self::with_parent(
            kind,
            function.name.clone(),
            function.location.clone(),
            &contract.name,
        )
    }

    pub fn from_node(node: &Node, contract: &Contract) -> Self {
        let name = node
            .expression
            .as_ref()
            .map(|e| e.to_string())
            .unwrap_or_else(|| node.id.to_string());
        Self::with_parent(ElementKind::Node, name, node.location.clone(), &contract.name)
    }

    pub fn from_variable(variable: &StateVariable, contract: &Contract) -> Self {
        Self::with_parent(
            ElementKind::Variable,
            variable.name.clone(),
            variable.location.clone(),
            &contract.name,
        )
    }

    pub fn from_pragma(pragma: &PragmaDirective) -> Self {
        Self {
            kind: ElementKind::Pragma,
            name: pragma.version_constraint.clone(),
            source_mapping: pragma.location.clone(),
            type_specific_fields: None,
        }
    }

    pub fn parent_name(&self) -> Option<&str> {
        self.type_specific_fields
            .as_ref()
            .map(|t| t.parent.name.as_str())
    }
}

#[derive(Debug, Clone)]
pub enum Fragment {
    Text(String),
    Element(SourceElement),
}

/// One reported issue instance. Created and owned by a single rule
/// invocation; the engine only ever moves findings, never mutates them.
#[derive(Debug, Clone)]
pub struct Finding {
    pub rule_id: String,
    pub impact: Impact,
    pub confidence: Confidence,
    pub fragments: Vec<Fragment>,
    pub additional_fields: Map<String, Value>,
}

impl Finding {
    pub fn new(rule_id: impl Into<String>, impact: Impact, confidence: Confidence) -> Self {
        Self {
            rule_id: rule_id.into(),
            impact,
            confidence,
            fragments: Vec::new(),
            additional_fields: Map::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.fragments.push(Fragment::Text(text.into()));
        self
    }

    pub fn with_element(mut self, element: SourceElement) -> Self {
        self.fragments.push(Fragment::Element(element));
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.additional_fields.insert(key.into(), value);
        self
    }

    /// The human-readable description: fragments in order, elements rendered
    /// by name.
    pub fn description(&self) -> String {
        let mut out = String::new();
        for fragment in &self.fragments {
            match fragment {
                Fragment::Text(text) => out.push_str(text),
                Fragment::Element(element) => out.push_str(&element.name),
            }
        }
        out
    }

    pub fn elements(&self) -> impl Iterator<Item = &SourceElement> {
        self.fragments.iter().filter_map(|f| match f {
            Fragment::Element(e) => Some(e),
            Fragment::Text(_) => None,
        })
    }

    pub fn first_element(&self) -> Option<&SourceElement> {
        self.elements().next()
    }
}

impl Serialize for Finding {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = if self.additional_fields.is_empty() { 5 } else { 6 };
        let mut s = serializer.serialize_struct("Finding", fields)?;
        s.serialize_field("check", &self.rule_id)?;
        s.serialize_field("impact", &self.impact)?;
        s.serialize_field("confidence", &self.confidence)?;
        s.serialize_field("description", &self.description())?;
        s.serialize_field("elements", &self.elements().collect::<Vec<_>>())?;
        if !self.additional_fields.is_empty() {
            s.serialize_field("additional_fields", &self.additional_fields)?;
        }
        s.end()
    }
}
