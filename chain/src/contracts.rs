//! Typed bindings for the deployed contracts.
//!
//! Generated with `sol!`; the shapes mirror the Solidity interfaces the
//! frontend was built against. Single-value returns come back as the bare
//! value, multi-value returns as a struct named after the function.

use alloy::sol;

sol! {
    #[sol(rpc)]
    contract KrnlVerifier {
        event VerificationRequested(bytes32 indexed requestId, address indexed subject);

        function isVerified(address subject) external view returns (bool);
        function getVerificationData(address subject) external view returns (bytes);
        function getVerificationStatus(bytes32 requestId) external view returns (bool completed, bool verified);
        function requestVerification(address subject, bytes calldata auxData) external returns (bytes32);
    }

    #[sol(rpc)]
    contract AccessGrant {
        event GrantCreated(uint256 indexed grantId, address indexed ngo);

        function createGrant(string calldata title, string calldata description, uint256 totalAmount, string[] calldata milestoneDescriptions, uint256[] calldata milestoneAmounts) external returns (uint256);
        function grantCount() external view returns (uint256);
        function getGrant(uint256 grantId) external view returns (address ngo, string title, string description, uint256 totalAmount, uint8 status, uint256 milestoneCount);
        function getMilestone(uint256 grantId, uint256 index) external view returns (string description, uint256 amount, uint8 status);
        function applyForGrant(uint256 grantId) external;
        function getApplicants(uint256 grantId) external view returns (address[]);
        function getApplicationStatus(uint256 grantId, address applicant) external view returns (uint8);
        function approveApplication(uint256 grantId, address applicant) external;
        function submitMilestone(uint256 grantId, uint256 index) external;
        function approveMilestone(uint256 grantId, uint256 index) external;
    }

    #[sol(rpc)]
    contract NGOAccessControl {
        function registerNGO(string calldata name) external;
        function getNGODetails(address ngo) external view returns (string name, bool registered);
        function isAuthorizedNGO(address ngo) external view returns (bool);
        function addAuthorizedNGO(address ngo) external;
        function removeAuthorizedNGO(address ngo) external;
    }
}
