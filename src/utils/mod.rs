pub(crate) mod bitarray;
pub(crate) mod bitset;
pub(crate) mod u8_keys;
