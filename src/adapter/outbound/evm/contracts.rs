//! Solidity bindings for the source-chain contracts.
//!
//! `IOAquaSender` lives next to the payload ABI it takes.

use alloy_sol_types::sol;

pub use crate::domain::payload::IOAquaSender;

sol! {
    #[sol(rpc)]
    contract IERC20 {
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
        function balanceOf(address account) external view returns (uint256);
    }

    #[derive(Debug)]
    struct SendParam {
        uint32 dstEid;
        bytes32 to;
        uint256 amountLD;
        uint256 minAmountLD;
        bytes extraOptions;
        bytes composeMsg;
        bytes oftCmd;
    }

    #[derive(Debug)]
    struct OFTLimit {
        uint256 minAmountLD;
        uint256 maxAmountLD;
    }

    #[derive(Debug)]
    struct OFTFeeDetail {
        int256 feeAmountLD;
        string description;
    }

    #[derive(Debug)]
    struct OFTReceipt {
        uint256 amountSentLD;
        uint256 amountReceivedLD;
    }

    #[sol(rpc)]
    contract IStargate {
        function quoteOFT(SendParam calldata sendParam)
            external
            view
            returns (OFTLimit memory limit, OFTFeeDetail[] memory feeDetails, OFTReceipt memory receipt);
    }
}
