use crate::consts::{TABLE_HASH_KEY0, TABLE_HASH_KEY1};
use siphasher::sip::SipHasher24;
use std::hash::Hasher;

/// SipHash-2-4 of `data` under the given keys.
pub fn sip_hash(data: &[u8], key0: u64, key1: u64) -> u64 {
    let mut h = SipHasher24::new_with_keys(key0, key1);
    h.write(data);
    h.finish()
}

/// Fingerprint of a table's declared schema name.
pub fn schema_fingerprint(name: &str) -> u64 {
    sip_hash(name.as_bytes(), TABLE_HASH_KEY0, TABLE_HASH_KEY1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_vector() {
        // key = 00 01 .. 0f, empty message
        let k0 = 0x0706_0504_0302_0100;
        let k1 = 0x0f0e_0d0c_0b0a_0908;
        assert_eq!(sip_hash(&[], k0, k1), 0x726f_db47_dd0e_0e31);
    }

    #[test]
    fn fingerprint_tracks_name() {
        assert_eq!(schema_fingerprint("Person"), schema_fingerprint("Person"));
        assert_ne!(schema_fingerprint("Person"), schema_fingerprint("person"));
        assert_ne!(schema_fingerprint("Person"), schema_fingerprint("PersonV2"));
    }
}
