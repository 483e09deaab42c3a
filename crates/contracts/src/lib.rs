//! Solidity bindings for the contracts the wallet talks to, plus the known
//! deployments per chain.

use {
    alloy::primitives::{Address, address},
    chain::Chain,
};

alloy::sol! {
    #[sol(rpc)]
    interface IERC20 {
        function name() external view returns (string memory);
        function symbol() external view returns (string memory);
        function decimals() external view returns (uint8);
        function balanceOf(address owner) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
    }

    #[sol(rpc)]
    interface IAaveProtocolDataProvider {
        struct TokenData {
            string symbol;
            address tokenAddress;
        }

        function getAllReservesTokens() external view returns (TokenData[] memory);
        function getAllATokens() external view returns (TokenData[] memory);
    }
}

/// Aave V2 `ProtocolDataProvider` deployment for a chain.
pub fn aave_protocol_data_provider(chain: Chain) -> Option<Address> {
    match chain {
        Chain::Mainnet => Some(address!("057835Ad21a177dbdd3090bB1CAE03EaCF78Fc6d")),
        _ => None,
    }
}

/// Lido `stETH` deployment for a chain.
pub fn lido_steth(chain: Chain) -> Option<Address> {
    match chain {
        Chain::Mainnet => Some(address!("ae7ab96520DE3A18E5e111B5EaAb095312D7fE84")),
        Chain::Goerli => Some(address!("1643E812aE58766192Cf7D2Cf9567dF2C37e9B7F")),
        _ => None,
    }
}
