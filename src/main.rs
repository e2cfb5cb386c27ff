#![cfg_attr(not(any(test, feature = "export-abi")), no_main)]

#[cfg(not(any(test, feature = "export-abi")))]
#[no_mangle]
pub extern "C" fn main() {}

/// Prints the Solidity interface of the ticketing platform.
#[cfg(feature = "export-abi")]
fn main() {
    ticketchain_contracts::print_from_args();
}
