//! Investment-asset emission owed to a bounty creator.

use ethers::types::U512;
use shared::types::{TokenAmount, U256};

use crate::error::{LedgerError, LedgerResult};

/// Decimal exponents past this yield a divisor larger than any 512-bit product.
const MAX_DIVISOR_EXPONENT: u32 = 154;

/// `floor(reward * emission_rate / 10^transaction_decimals)`.
///
/// `emission_rate` is fixed point with 18 decimals: investment units paid per
/// whole transaction unit. The product is formed in 512 bits so it cannot
/// overflow; a quotient that does not fit back into 256 bits is rejected.
/// Any remainder below one investment unit is dropped.
pub fn compute_emission(
    reward: TokenAmount,
    emission_rate: TokenAmount,
    transaction_decimals: u32,
) -> LedgerResult<TokenAmount> {
    if transaction_decimals > MAX_DIVISOR_EXPONENT {
        return Ok(U256::zero());
    }

    let product: U512 = reward.full_mul(emission_rate);
    let quotient = product / U512::exp10(transaction_decimals as usize);

    U256::try_from(quotient).map_err(|_| LedgerError::EmissionOverflow { reward })
}
