//! XOR stream transform
//!
//! Each byte is XORed with the key byte at its index modulo the key length,
//! so applying the transform twice with the same key reproduces the input.

use super::key::{SystemKey, KEY_LEN};

/// Mask or unmask a buffer in place with the system key
pub fn transform(data: &mut [u8], key: &SystemKey) {
    let key_bytes = key.as_bytes();
    for (i, byte) in data.iter_mut().enumerate() {
        *byte ^= key_bytes[i % KEY_LEN];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_is_self_inverse() {
        let key = SystemKey::generate();
        let original = b"hello card file payload".to_vec();

        let mut buf = original.clone();
        transform(&mut buf, &key);
        assert_ne!(buf, original);

        transform(&mut buf, &key);
        assert_eq!(buf, original);
    }

    #[test]
    fn test_wrong_key_does_not_restore() {
        let key_a = SystemKey::generate();
        let key_b = SystemKey::generate();
        let original = vec![0u8; 32];

        let mut buf = original.clone();
        transform(&mut buf, &key_a);
        transform(&mut buf, &key_b);
        // No checksum exists; a wrong key silently yields garbage.
        assert_ne!(buf, original);
    }

    #[test]
    fn test_key_repeats_modulo_sixteen() {
        let key = SystemKey::generate();
        let mut buf = vec![0u8; KEY_LEN * 2];
        transform(&mut buf, &key);
        assert_eq!(&buf[..KEY_LEN], &buf[KEY_LEN..]);
    }

    #[test]
    fn test_empty_buffer() {
        let key = SystemKey::generate();
        let mut buf: Vec<u8> = Vec::new();
        transform(&mut buf, &key);
        assert!(buf.is_empty());
    }
}
