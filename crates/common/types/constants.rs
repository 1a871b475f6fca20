use ethereum_types::U256;

/// Number of bytes in a single EIP-4844 blob.
pub const BYTES_PER_BLOB: usize = 4096 * 32;

/// Gas consumed per blob, independent of its content.
pub const GAS_PER_BLOB: u64 = 1 << 17;

/// EIP-1559: base fee may move by at most 1/8th per block.
pub const BASE_FEE_MAX_CHANGE_DENOMINATOR: u64 = 8;
/// EIP-1559: target gas usage is half of the block gas limit.
pub const ELASTICITY_MULTIPLIER: u64 = 2;
/// EIP-1559 base fee at the London activation block, in wei.
pub const INITIAL_BASE_FEE: u64 = 1_000_000_000;

/// EIP-1985/limits: maximum relative per-block gas limit adjustment, as a divisor.
pub const GAS_LIMIT_ADJUSTMENT_FACTOR: u64 = 1024;
/// Minimum allowed block gas limit.
pub const GAS_LIMIT_MINIMUM: u64 = 5000;

pub const GWEI_TO_WEI: u64 = 1_000_000_000;

/// EIP-4844: minimum possible blob base fee, in wei.
pub const MIN_BASE_FEE_PER_BLOB_GAS: U256 = U256([1, 0, 0, 0]);
/// EIP-4844: denominator controlling how fast the blob base fee adjusts to excess blob gas.
pub const BLOB_BASE_FEE_UPDATE_FRACTION: U256 = U256([3_338_477, 0, 0, 0]);
/// EIP-4844: maximum number of blobs carried by a single block.
pub const MAX_BLOB_NUMBER_PER_BLOCK: usize = 6;
/// EIP-4844: version byte prefixed to a blob's versioned hash.
pub const VERSIONED_HASH_VERSION_KZG: u8 = 0x01;

/// Base intrinsic gas cost of any transaction.
pub const TX_BASE_COST: u64 = 21_000;
/// Additional intrinsic gas cost for contract-creation transactions.
pub const TX_CREATE_COST: u64 = 53_000;
/// Gas cost of a zero payload byte.
pub const TX_DATA_ZERO_GAS_COST: u64 = 4;
/// Gas cost of a non-zero payload byte, post EIP-2028.
pub const TX_DATA_NON_ZERO_GAS_EIP2028: u64 = 16;
/// Gas cost per 32-byte word of initcode, EIP-3860.
pub const TX_INIT_CODE_WORD_GAS_COST: u64 = 2;
/// EIP-3860: maximum initcode length a creation transaction may carry.
pub const MAX_INITCODE_SIZE: usize = 2 * 0x6000;

/// EIP-2930: gas cost per access-list address entry.
pub const TX_ACCESS_LIST_ADDRESS_GAS: u64 = 2_400;
/// EIP-2930: gas cost per access-list storage key.
pub const TX_ACCESS_LIST_STORAGE_KEY_GAS: u64 = 1_900;
/// EIP-7702: gas cost per authorization tuple.
pub const PER_EMPTY_ACCOUNT_COST: u64 = 25_000;

/// Post-London gas refund quotient: at most 1/5th of gas used may be refunded.
pub const GAS_REFUND_DENOMINATOR_LONDON: u64 = 5;
/// Pre-London gas refund quotient: at most 1/2 of gas used may be refunded.
pub const GAS_REFUND_DENOMINATOR_FRONTIER: u64 = 2;
/// Legacy self-destruct refund, zeroed out post-London (EIP-3529).
pub const SELF_DESTRUCT_REFUND: u64 = 24_000;

pub const MAX_CODE_SIZE: usize = 0x6000;
pub const MAX_CREATE_CODE_SIZE: usize = 2 * MAX_CODE_SIZE;
