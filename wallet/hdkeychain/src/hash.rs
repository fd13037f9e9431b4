use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Computes `RIPEMD160(SHA256(data))`.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(Sha256::digest(data)).into()
}

/// First four bytes of `SHA256(SHA256(data))`, as appended by base58check.
pub fn checksum(data: &[u8]) -> [u8; 4] {
    let digest = Sha256::digest(Sha256::digest(data));
    [digest[0], digest[1], digest[2], digest[3]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use faster_hex::hex_string;

    #[test]
    fn hash160_of_bip32_master_public_key() {
        let mut public_key = [0u8; 33];
        faster_hex::hex_decode(b"0339a36013301597daef41fbe593a02cc513d0b55527ec2df1050e2e8ff49c85c2", &mut public_key).unwrap();
        assert_eq!(hex_string(&hash160(&public_key)), "3442193e1bb70916e914552172cd4e2dbc9df811");
    }

    #[test]
    fn checksum_of_empty_input() {
        // SHA256(SHA256("")) = 5df6e0e2...
        assert_eq!(checksum(&[]), [0x5d, 0xf6, 0xe0, 0xe2]);
    }
}
