use hdkeychain::{
    generate_seed, ChildNumber, Error, ExtendedKey, ExtendedKeyAttrs, KeyKind, NetworkParams, NetworkRegistry, SerializedKey, Seed,
    HARDENED_KEY_START, RECOMMENDED_SEED_LEN,
};
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

const SEED: [u8; 16] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];

const M_0H_1_XPRV: &str = "xprv9wTYmMFdV23N2TdNG573QoEsfRrWKQgWeibmLntzniatZvR9BmLnvSxqu53Kw1UmYPxLgboyZQaXwTCg8MSY3H2EU4pWcQDnRnrVA1xe8fs";
const M_0H_1_XPUB: &str = "xpub6ASuArnXKPbfEwhqN6e3mwBcDTgzisQN1wXN9BJcM47sSikHjJf3UFHKkNAWbWMiGj7Wf5uMash7SyYq527Hqck2AxYysAA7xmALppuCkwQ";

fn master() -> ExtendedKey {
    ExtendedKey::new_master(SEED, &NetworkParams::mainnet()).unwrap()
}

fn corrupt_last_char(encoded: &str) -> String {
    let mut corrupted = encoded.to_string();
    let last = corrupted.pop().unwrap();
    corrupted.push(if last == '2' { '3' } else { '2' });
    corrupted
}

#[test]
fn hardened_then_normal_child() {
    let key = master().derive_child(ChildNumber(HARDENED_KEY_START)).unwrap().derive_child(ChildNumber(1)).unwrap();
    let encoded = key.encode().unwrap();
    assert_eq!(encoded.len(), 111);
    assert_eq!(encoded.as_str(), M_0H_1_XPRV);

    let public = key.neuter().unwrap().encode().unwrap();
    assert_eq!(public.as_str(), M_0H_1_XPUB);
    assert_ne!(public.as_str(), encoded.as_str());
}

#[test]
fn master_seed_length_bounds() {
    let mainnet = NetworkParams::mainnet();
    assert_eq!(ExtendedKey::new_master([7u8; 15], &mainnet).unwrap_err(), Error::InvalidSeedLength(15));
    assert!(ExtendedKey::new_master([7u8; 16], &mainnet).is_ok());
    assert!(ExtendedKey::new_master([7u8; 64], &mainnet).is_ok());
    assert_eq!(ExtendedKey::new_master([7u8; 65], &mainnet).unwrap_err(), Error::InvalidSeedLength(65));
}

#[test]
fn corrupted_checksum_is_reported_as_such() {
    assert_eq!(corrupt_last_char(M_0H_1_XPRV).parse::<ExtendedKey>().unwrap_err(), Error::BadChecksum);
    assert_eq!(corrupt_last_char(M_0H_1_XPUB).parse::<ExtendedKey>().unwrap_err(), Error::BadChecksum);
}

#[test]
fn hardened_child_of_neutered_key() {
    let public = master().neuter().unwrap();
    for index in [HARDENED_KEY_START, HARDENED_KEY_START + 1, u32::MAX] {
        assert_eq!(public.derive_child(ChildNumber(index)).unwrap_err(), Error::DeriveHardenedFromPublic);
    }
    // the parent is unaffected by the failed attempt
    assert_eq!(public, master().neuter().unwrap());
}

#[test]
fn zeroed_key_refuses_to_serialize() {
    let mut key = master();
    key.zero();
    assert_eq!(key.encode().unwrap_err(), Error::ZeroedKey);
    assert!(serde_json::to_string(&key).is_err());

    let mut public = master().neuter().unwrap();
    public.zero();
    assert!(!public.is_private());
    assert_eq!(public.encode().unwrap_err(), Error::ZeroedKey);
    assert_eq!(public.public_key_bytes().unwrap_err(), Error::EmptyPublicKey);
}

#[test]
fn decode_error_taxonomy() {
    assert!(matches!("0OIl".parse::<ExtendedKey>(), Err(Error::Base58(_))));
    assert!(matches!("xprv".parse::<ExtendedKey>(), Err(Error::InvalidKeyLength(_))));

    let master = master();
    let serialized = |version, key_bytes| {
        SerializedKey { version, attrs: ExtendedKeyAttrs { chain_code: *master.chain_code(), ..Default::default() }, key_bytes }
            .to_base58()
            .to_string()
    };
    let public_key = master.public_key_bytes().unwrap();

    assert_eq!(serialized(0xdead_beef, public_key).parse::<ExtendedKey>().unwrap_err(), Error::UnknownVersion(0xdead_beef));

    // private version with point-shaped or out of range key bytes
    assert_eq!(serialized(0x0488_ade4, public_key).parse::<ExtendedKey>().unwrap_err(), Error::InvalidPrivateKey);
    let mut overflow = [0xffu8; 33];
    overflow[0] = 0;
    assert_eq!(serialized(0x0488_ade4, overflow).parse::<ExtendedKey>().unwrap_err(), Error::InvalidPrivateKey);
    assert_eq!(serialized(0x0488_ade4, [0u8; 33]).parse::<ExtendedKey>().unwrap_err(), Error::InvalidPrivateKey);

    // public version with bytes that are not a curve point
    assert_eq!(serialized(0x0488_b21e, [0u8; 33]).parse::<ExtendedKey>().unwrap_err(), Error::InvalidPublicKey);
    let mut bad_tag = public_key;
    bad_tag[0] = 0x05;
    assert_eq!(serialized(0x0488_b21e, bad_tag).parse::<ExtendedKey>().unwrap_err(), Error::InvalidPublicKey);
    // well tagged, but no point on secp256k1 has this x coordinate
    let mut off_curve = [0u8; 33];
    faster_hex::hex_decode(b"0270ac8110203e9f95f8d832964b58ccc2c712bb1c6cd58e861134b48f456c9b53", &mut off_curve).unwrap();
    assert_eq!(serialized(0x0488_b21e, off_curve).parse::<ExtendedKey>().unwrap_err(), Error::InvalidPublicKey);

    assert!(serialized(0x0488_b21e, public_key).parse::<ExtendedKey>().is_ok());
}

#[test]
fn retargeting_preserves_payload() {
    let key: ExtendedKey = M_0H_1_XPRV.parse().unwrap();
    let public = key.neuter().unwrap();

    for (network, private_prefix, public_prefix) in [(NetworkParams::testnet(), "tprv", "tpub"), (NetworkParams::simnet(), "sprv", "spub")] {
        let mut retargeted = key.clone();
        retargeted.set_net(&network);
        assert!(retargeted.is_for_net(&network));
        assert!(!retargeted.is_for_net(&NetworkParams::mainnet()));
        assert_eq!(retargeted.version(), network.version(KeyKind::Private));
        assert_eq!(retargeted.attrs(), key.attrs());

        let encoded = retargeted.encode().unwrap();
        assert!(encoded.starts_with(private_prefix));
        let mut decoded: ExtendedKey = encoded.parse().unwrap();
        assert!(decoded.is_for_net(&network));
        decoded.set_net(&NetworkParams::mainnet());
        assert_eq!(decoded.encode().unwrap().as_str(), M_0H_1_XPRV);

        // neutering keeps the network
        let neutered = retargeted.neuter().unwrap();
        assert_eq!(neutered.version(), network.version(KeyKind::Public));
        assert!(neutered.encode().unwrap().starts_with(public_prefix));

        let mut public = public.clone();
        public.set_net(&network);
        assert_eq!(public, neutered);
        public.set_net(&NetworkParams::mainnet());
        assert_eq!(public.encode().unwrap().as_str(), M_0H_1_XPUB);
    }
}

#[test]
fn custom_network_registry() {
    let devnet = NetworkParams::new("devnet", 0x0102_0304, 0x0506_0708, 0x42);
    let mut registry = NetworkRegistry::default();
    registry.register(devnet.clone()).unwrap();

    let key = ExtendedKey::new_master(SEED, &devnet).unwrap().derive_child(ChildNumber(5)).unwrap();
    let encoded = key.encode().unwrap();
    assert_eq!(ExtendedKey::decode(&encoded, &registry).unwrap(), key);
    assert_eq!(encoded.parse::<ExtendedKey>().unwrap_err(), Error::UnknownVersion(0x0102_0304));

    let public = key.neuter().unwrap();
    assert_eq!(public.version(), 0x0506_0708);
    assert_eq!(ExtendedKey::decode(&public.encode().unwrap(), &registry).unwrap(), public);
    assert_eq!(key.address(&devnet).unwrap().version(), 0x42);
}

#[test]
fn public_derivation_matches_private_derivation() {
    let seed = Seed::generate_with(&mut ChaCha8Rng::seed_from_u64(42), RECOMMENDED_SEED_LEN).unwrap();
    let master = ExtendedKey::new_master(&seed, &NetworkParams::mainnet()).unwrap();
    let account = master.derive_path(&"m/44'/0'/0'".parse().unwrap()).unwrap();
    let account_public = account.neuter().unwrap();

    for index in [0u32, 1, 2, 19, 0x7fff_ffff] {
        let private_child = account.derive_child(ChildNumber(index)).unwrap();
        let public_child = account_public.derive_child(ChildNumber(index)).unwrap();
        assert_eq!(private_child.neuter().unwrap(), public_child);
        assert_eq!(private_child.fingerprint().unwrap(), public_child.fingerprint().unwrap());
        assert_eq!(private_child.ec_public_key().unwrap(), public_child.ec_public_key().unwrap());
    }
}

#[test]
fn derivation_is_deterministic() {
    let seed = generate_seed(RECOMMENDED_SEED_LEN).unwrap();
    let path = "m/0'/7/3'".parse().unwrap();
    let first = ExtendedKey::new_master(&seed, &NetworkParams::testnet()).unwrap().derive_path(&path).unwrap();
    let second = ExtendedKey::new_master(&seed, &NetworkParams::testnet()).unwrap().derive_path(&path).unwrap();
    assert_eq!(first.encode().unwrap().as_str(), second.encode().unwrap().as_str());
    assert!(first.encode().unwrap().starts_with("tprv"));
}

#[test]
fn ec_keys_and_address() {
    let master = master();
    let secret = master.ec_private_key().unwrap();
    let public = master.ec_public_key().unwrap();
    assert_eq!(hdkeychain::secp256k1::PublicKey::from_secret_key_global(&secret), public);
    assert_eq!(public.serialize(), master.public_key_bytes().unwrap());

    let address = master.address(&NetworkParams::mainnet()).unwrap();
    assert_eq!(address.to_string(), "15mKKb2eos1hWa6tisdPwwDC1a5J1y9nma");
    assert!(address.is_for_net(&NetworkParams::mainnet()));
    assert_eq!(&address.hash160()[..4], &master.fingerprint().unwrap()[..]);
    assert_eq!(master.neuter().unwrap().address(&NetworkParams::mainnet()).unwrap(), address);
}

#[test]
fn serde_as_base58_string() {
    let key: ExtendedKey = M_0H_1_XPRV.parse().unwrap();
    let json = serde_json::to_string(&key).unwrap();
    assert_eq!(json, format!("\"{M_0H_1_XPRV}\""));
    assert_eq!(serde_json::from_str::<ExtendedKey>(&json).unwrap(), key);

    let keys = vec![key.neuter().unwrap(), key.clone()];
    let json = serde_json::to_string(&keys).unwrap();
    assert_eq!(serde_json::from_str::<Vec<ExtendedKey>>(&json).unwrap(), keys);
    assert!(serde_json::from_str::<ExtendedKey>("\"xpub\"").is_err());
}
