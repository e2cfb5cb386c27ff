use alloy_sol_types::sol;

sol! {
    /// The non-transferable ticket collection behind a ticket class issuance handle.
    interface ITicketIssuance {
        function mint(address owner) external returns (uint256);
        function balanceOf(address owner) external view returns (uint256);
    }

    /// Fungible payment asset other than the native currency.
    interface IERC20 {
        function transferFrom(address from, address to, uint256 amount) external returns (bool);
        function transfer(address to, uint256 amount) external returns (bool);
        function balanceOf(address account) external view returns (uint256);
    }
}
