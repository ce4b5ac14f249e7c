//! Token-standard signature tables and approximate standard detection.

use crate::ir::{Contract, Erc};

pub const ERC20_SIGNATURES: [&str; 6] = [
    "totalSupply()",
    "balanceOf(address)",
    "transfer(address,uint256)",
    "transferFrom(address,address,uint256)",
    "approve(address,uint256)",
    "allowance(address,address)",
];

pub const ERC165_SIGNATURES: [&str; 1] = ["supportsInterface(bytes4)"];

pub const ERC223_SIGNATURES: [&str; 7] = [
    "name()",
    "symbol()",
    "decimals()",
    "totalSupply()",
    "balanceOf(address)",
    "transfer(address,uint256)",
    "transfer(address,uint256,bytes)",
];

pub const ERC721_SIGNATURES: [&str; 9] = [
    "balanceOf(address)",
    "ownerOf(uint256)",
    "safeTransferFrom(address,address,uint256,bytes)",
    "safeTransferFrom(address,address,uint256)",
    "transferFrom(address,address,uint256)",
    "approve(address,uint256)",
    "setApprovalForAll(address,bool)",
    "getApproved(uint256)",
    "isApprovedForAll(address,address)",
];

pub const ERC777_SIGNATURES: [&str; 13] = [
    "name()",
    "symbol()",
    "granularity()",
    "totalSupply()",
    "balanceOf(address)",
    "send(address,uint256,bytes)",
    "burn(uint256,bytes)",
    "isOperatorFor(address,address)",
    "authorizeOperator(address)",
    "revokeOperator(address)",
    "defaultOperators()",
    "operatorSend(address,address,uint256,bytes,bytes)",
    "operatorBurn(address,uint256,bytes,bytes)",
];

pub const ERC1155_SIGNATURES: [&str; 6] = [
    "balanceOf(address,uint256)",
    "balanceOfBatch(address[],uint256[])",
    "setApprovalForAll(address,bool)",
    "isApprovedForAll(address,address)",
    "safeTransferFrom(address,address,uint256,uint256,bytes)",
    "safeBatchTransferFrom(address,address,uint256[],uint256[],bytes)",
];

pub const ERC1363_SIGNATURES: [&str; 6] = [
    "transferAndCall(address,uint256)",
    "transferAndCall(address,uint256,bytes)",
    "transferFromAndCall(address,address,uint256)",
    "transferFromAndCall(address,address,uint256,bytes)",
    "approveAndCall(address,uint256)",
    "approveAndCall(address,uint256,bytes)",
];

pub const ERC1820_SIGNATURES: [&str; 1] = ["canImplementInterfaceForAddress(bytes32,address)"];

pub const ERC2612_SIGNATURES: [&str; 3] = [
    "permit(address,address,uint256,uint256,uint8,bytes32,bytes32)",
    "nonces(address)",
    "DOMAIN_SEPARATOR()",
];

pub const ERC4524_SIGNATURES: [&str; 4] = [
    "safeTransfer(address,uint256)",
    "safeTransfer(address,uint256,bytes)",
    "safeTransferFrom(address,address,uint256)",
    "safeTransferFrom(address,address,uint256,bytes)",
];

pub const ERC4626_SIGNATURES: [&str; 16] = [
    "asset()",
    "totalAssets()",
    "convertToShares(uint256)",
    "convertToAssets(uint256)",
    "maxDeposit(address)",
    "previewDeposit(uint256)",
    "deposit(uint256,address)",
    "maxMint(address)",
    "previewMint(uint256)",
    "mint(uint256,address)",
    "maxWithdraw(address)",
    "previewWithdraw(uint256)",
    "withdraw(uint256,address,address)",
    "maxRedeem(address)",
    "previewRedeem(uint256)",
    "redeem(uint256,address,address)",
];

fn all_tables() -> Vec<(Erc, &'static [&'static str])> {
    vec![
        (Erc::Erc20, &ERC20_SIGNATURES),
        (Erc::Erc165, &ERC165_SIGNATURES),
        (Erc::Erc1820, &ERC1820_SIGNATURES),
        (Erc::Erc223, &ERC223_SIGNATURES),
        (Erc::Erc721, &ERC721_SIGNATURES),
        (Erc::Erc777, &ERC777_SIGNATURES),
        (Erc::Erc1155, &ERC1155_SIGNATURES),
        (Erc::Erc2612, &ERC2612_SIGNATURES),
        (Erc::Erc1363, &ERC1363_SIGNATURES),
        (Erc::Erc4524, &ERC4524_SIGNATURES),
        (Erc::Erc4626, &ERC4626_SIGNATURES),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardMatch {
    pub erc: Erc,
    pub matched: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StandardGuess {
    /// The host framework already identified the standards.
    Detected(Vec<Erc>),
    /// Best approximate match with at least 80 % of required signatures.
    Approximate(StandardMatch),
    /// Nothing close; carries every standard that was checked.
    NoMatch(Vec<Erc>),
}

/// Guess which token standard a contract implements, mirroring the host
/// framework's detection first and falling back to signature counting.
pub fn guess_standard(contract: &Contract) -> StandardGuess {
    if !contract.ercs.is_empty() {
        return StandardGuess::Detected(contract.ercs.clone());
    }

    let signatures = contract.function_signatures();
    let mut matches: Vec<StandardMatch> = all_tables()
        .into_iter()
        .map(|(erc, table)| StandardMatch {
            erc,
            matched: table.iter().filter(|s| signatures.contains(**s)).count(),
            total: table.len(),
        })
        .collect();

    // Keep candidates matching at least 80 percent, best ratio first.
    matches.sort_by(|a, b| {
        (b.matched * a.total).cmp(&(a.matched * b.total))
    });
    let best = matches
        .iter()
        .find(|m| m.matched * 5 >= m.total * 4)
        .cloned();

    match best {
        Some(m) => StandardGuess::Approximate(m),
        None => StandardGuess::NoMatch(matches.iter().map(|m| m.erc).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Function;
    use crate::ir::Parameter;

    fn erc20_like(missing: usize) -> Contract {
        let mut functions = Vec::new();
        for sig in ERC20_SIGNATURES.iter().take(ERC20_SIGNATURES.len() - missing) {
            let name = sig.split('(').next().unwrap();
            let args: Vec<Parameter> = sig
                .split('(')
                .nth(1)
                .unwrap()
                .trim_end_matches(')')
                .split(',')
                .filter(|s| !s.is_empty())
                .enumerate()
                .map(|(i, ty)| Parameter::new(format!("a{}", i), ty))
                .collect();
            functions.push(Function::new(name).with_parameters(args));
        }
        Contract::new("Token").with_functions(functions)
    }

    #[test]
    fn test_detected_wins_over_signatures() {
        let contract = Contract::new("Token").with_ercs(vec![Erc::Erc20]);
        assert_eq!(
            guess_standard(&contract),
            StandardGuess::Detected(vec![Erc::Erc20])
        );
    }

    #[test]
    fn test_approximate_at_five_of_six() {
        let contract = erc20_like(1);
        match guess_standard(&contract) {
            StandardGuess::Approximate(m) => {
                assert_eq!(m.erc, Erc::Erc20);
                assert_eq!(m.matched, 5);
                assert_eq!(m.total, 6);
            }
            other => panic!("expected approximate match, got {:?}", other),
        }
    }

    #[test]
    fn test_no_match_below_threshold() {
        let contract = erc20_like(3);
        assert!(matches!(guess_standard(&contract), StandardGuess::NoMatch(_)));
    }
}
