//! Contracts and the analysis unit handed over by the host framework.
//!
//! Everything here is an immutable snapshot: the host framework constructs
//! the unit once per run and rules only ever borrow it.

use crate::ir::function::{Function, Visibility};
use crate::ir::node::SourceMapping;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateVariable {
    pub name: String,
    pub type_name: String,
    pub visibility: Visibility,
    pub location: SourceMapping,
}

impl StateVariable {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            // Solidity default when no visibility is written out.
            visibility: Visibility::Internal,
            location: SourceMapping::default(),
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_location(mut self, location: SourceMapping) -> Self {
        self.location = location;
        self
    }
}

/// Token standards the host framework detected on a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Erc {
    Erc20,
    Erc165,
    Erc223,
    Erc721,
    Erc777,
    Erc1155,
    Erc1363,
    Erc1820,
    Erc2612,
    Erc4524,
    Erc4626,
}

impl Erc {
    pub fn name(&self) -> &'static str {
        match self {
            Erc::Erc20 => "ERC20",
            Erc::Erc165 => "ERC165",
            Erc::Erc223 => "ERC223",
            Erc::Erc721 => "ERC721",
            Erc::Erc777 => "ERC777",
            Erc::Erc1155 => "ERC1155",
            Erc::Erc1363 => "ERC1363",
            Erc::Erc1820 => "ERC1820",
            Erc::Erc2612 => "ERC2612",
            Erc::Erc4524 => "ERC4524",
            Erc::Erc4626 => "ERC4626",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    pub name: String,
    /// All functions, including inherited ones, in declaration order.
    pub functions: Vec<Function>,
    pub state_variables: Vec<StateVariable>,
    /// Standards the host framework positively identified.
    pub ercs: Vec<Erc>,
    pub location: SourceMapping,
}

impl Contract {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            functions: Vec::new(),
            state_variables: Vec::new(),
            ercs: Vec::new(),
            location: SourceMapping::default(),
        }
    }

    pub fn with_functions(mut self, functions: Vec<Function>) -> Self {
        self.functions = functions;
        self
    }

    pub fn with_state_variables(mut self, state_variables: Vec<StateVariable>) -> Self {
        self.state_variables = state_variables;
        self
    }

    pub fn with_ercs(mut self, ercs: Vec<Erc>) -> Self {
        self.ercs = ercs;
        self
    }

    pub fn with_location(mut self, location: SourceMapping) -> Self {
        self.location = location;
        self
    }

    /// Externally callable implemented functions.
    pub fn entry_points(&self) -> impl Iterator<Item = &Function> {
        self.functions
            .iter()
            .filter(|f| f.is_entry_point() && f.is_implemented)
    }

    pub fn function_signatures(&self) -> HashSet<String> {
        self.functions.iter().map(|f| f.signature()).collect()
    }

    /// Names of functions reached through internal calls anywhere in the
    /// contract, used to spot public functions that could be external.
    pub fn internally_called_names(&self) -> HashSet<&str> {
        let mut out = HashSet::new();
        for f in &self.functions {
            out.extend(f.internal_callees());
        }
        out
    }
}

/// One pragma directive as written in source, e.g. `pragma solidity ^0.8.0;`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PragmaDirective {
    /// Directive head, `solidity` for version pragmas.
    pub directive: String,
    /// The raw constraint text, e.g. `^0.8.0`.
    pub version_constraint: String,
    pub location: SourceMapping,
}

impl PragmaDirective {
    pub fn solidity(constraint: impl Into<String>) -> Self {
        Self {
            directive: "solidity".to_string(),
            version_constraint: constraint.into(),
            location: SourceMapping::default(),
        }
    }

    pub fn with_location(mut self, location: SourceMapping) -> Self {
        self.location = location;
        self
    }

    pub fn is_version_pragma(&self) -> bool {
        self.directive == "solidity"
    }
}

/// The whole compilation unit a run operates on. Supplied fully materialized
/// by the host framework; a run never touches I/O.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisUnit {
    /// Derivation-resolved contracts, most-derived only.
    pub contracts: Vec<Contract>,
    pub pragma_directives: Vec<PragmaDirective>,
    /// Concrete compiler version the unit was built with, when known.
    pub solc_version: Option<String>,
}

impl AnalysisUnit {
    pub fn new(contracts: Vec<Contract>) -> Self {
        Self {
            contracts,
            pragma_directives: Vec::new(),
            solc_version: None,
        }
    }

    pub fn with_pragmas(mut self, pragmas: Vec<PragmaDirective>) -> Self {
        self.pragma_directives = pragmas;
        self
    }

    pub fn with_solc_version(mut self, version: impl Into<String>) -> Self {
        self.solc_version = Some(version.into());
        self
    }
}
