//! Module for reading compiled contracts from the build output of Foundry.
//!
//! `forge build` writes one JSON file per contract to
//! `<out>/<ContractFile.sol>/<ContractName>.json`. Only the `abi` and the
//! `bytecode.object` fields are read.

use crate::errors::ArtifactError;
use ethabi::Contract as Abi;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use web3::types::Bytes;

/// The default build output directory.
pub const DEFAULT_BASE_PATH: &str = "out/";

/// The ABI and deployment bytecode of a compiled contract.
#[derive(Clone, Debug)]
pub struct CompiledContract {
    /// The contract ABI.
    pub abi: Abi,
    /// The deployment bytecode, empty for interfaces and abstract contracts.
    pub bytecode: Bytes,
}

#[derive(Deserialize)]
struct FoundryArtifact {
    abi: Abi,
    #[serde(default)]
    bytecode: Option<FoundryBytecode>,
}

#[derive(Deserialize)]
struct FoundryBytecode {
    object: String,
}

impl CompiledContract {
    /// Parse a compiled contract from Foundry artifact JSON.
    pub fn from_json<S>(json: S) -> Result<Self, ArtifactError>
    where
        S: AsRef<str>,
    {
        let artifact: FoundryArtifact = serde_json::from_str(json.as_ref())?;
        artifact.try_into_compiled()
    }

    /// Load a compiled contract from a Foundry artifact file.
    pub fn load<P>(path: P) -> Result<Self, ArtifactError>
    where
        P: AsRef<Path>,
    {
        let file = BufReader::new(File::open(path)?);
        let artifact: FoundryArtifact = serde_json::from_reader(file)?;
        artifact.try_into_compiled()
    }
}

impl FoundryArtifact {
    fn try_into_compiled(self) -> Result<CompiledContract, ArtifactError> {
        let bytecode = match self.bytecode {
            Some(bytecode) => {
                let object = bytecode.object.trim();
                hex::decode(object.strip_prefix("0x").unwrap_or(object))?
            }
            None => Vec::new(),
        };

        Ok(CompiledContract {
            abi: self.abi,
            bytecode: Bytes(bytecode),
        })
    }
}

/// Load a compiled contract from `<base_path>/<contract_file>/<name>.json`.
///
/// The contract name defaults to the file name without its extension, so
/// `load_compiled("Token.sol", None, "out/")` reads `out/Token.sol/Token.json`.
pub fn load_compiled<P>(
    contract_file: &str,
    contract_name: Option<&str>,
    base_path: P,
) -> Result<CompiledContract, ArtifactError>
where
    P: AsRef<Path>,
{
    let name = match contract_name {
        Some(name) => name,
        None => Path::new(contract_file)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(contract_file),
    };
    let path = base_path
        .as_ref()
        .join(contract_file)
        .join(format!("{}.json", name));

    CompiledContract::load(path)
}
