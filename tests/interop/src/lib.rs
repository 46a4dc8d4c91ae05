//! Integration tests for seedwell.
//! Cross-module generator construction, negotiation and usage tests.

#[cfg(test)]
mod tests {
    use rand_core::TryRngCore;
    use seedwell_crypto::drbg::{CtrDrbg, DrbgConfig, HmacDrbg};
    use seedwell_crypto::entropy::EntropySource;
    use seedwell_crypto::hash::SoftDigest;
    use seedwell_crypto::provider::CryptoProvider;
    use seedwell_crypto::{
        Drbg, GenerateOutcome, HashDrbg, RandomFactory, RandomSpec, RandomSpecBuilder,
        RandomType, SecureRandom, SoftwareProvider,
    };
    use seedwell_types::{
        CryptoError, DigestLength, DigestSpec, DigestType, KeyLength, SymKeySpec, SymKeyType,
    };
    use std::collections::HashSet;
    use std::sync::Arc;

    /// Returns `0x00..0x1F` repeatedly.
    struct FakeEntropy;

    impl EntropySource for FakeEntropy {
        fn name(&self) -> &str {
            "fake"
        }

        fn get_entropy(&mut self, buf: &mut [u8]) -> Result<(), CryptoError> {
            for (i, b) in buf.iter_mut().enumerate() {
                *b = (i % 32) as u8;
            }
            Ok(())
        }
    }

    fn sha256() -> DigestSpec {
        DigestSpec::sha2(DigestLength::Len256)
    }

    fn hash_drbg(config: DrbgConfig) -> HashDrbg {
        HashDrbg::new(
            Box::new(SoftDigest::new(&sha256()).unwrap()),
            Box::new(FakeEntropy),
            None,
            None,
            config,
        )
        .unwrap()
    }

    fn software() -> RandomFactory {
        RandomFactory::new(Arc::new(SoftwareProvider))
    }

    // -------------------------------------------------------
    // 1. Hash_DRBG state evolves between requests
    // -------------------------------------------------------
    #[test]
    fn test_hash_drbg_outputs_differ() {
        let mut drbg = hash_drbg(DrbgConfig::default());
        let mut first = [0u8; 16];
        let mut second = [0u8; 16];
        assert_eq!(
            drbg.generate(&mut first, None, false).unwrap(),
            GenerateOutcome::Generated(128)
        );
        assert_eq!(
            drbg.generate(&mut second, None, false).unwrap(),
            GenerateOutcome::Generated(128)
        );
        assert_ne!(first, second);
        assert_eq!(drbg.algorithm_name(), "SHA2-256/Hash_DRBG");
    }

    // -------------------------------------------------------
    // 2. Builder names
    // -------------------------------------------------------
    #[test]
    fn test_hash_resist_spec() {
        let spec = RandomSpecBuilder::hash_resist(sha256());
        assert!(spec.is_valid());
        assert!(spec.is_prediction_resistant());
        assert_eq!(spec.to_string(), format!("HASH-{}-resistant", sha256()));
        assert_eq!(spec.name(), "HASH-SHA2-256-resistant");
    }

    #[test]
    fn test_builder_names() {
        let aes = SymKeySpec::aes(KeyLength::Len128);
        assert_eq!(RandomSpecBuilder::ctr(aes).name(), "CTR-AES-128");
        assert_eq!(RandomSpecBuilder::x931_resist(aes).name(), "X931-AES-128-resistant");
        assert_eq!(RandomSpecBuilder::hmac(DigestSpec::sha1()).name(), "HMAC-SHA1");

        let bad = RandomSpec::new(RandomType::Hash, aes, false);
        assert!(!bad.is_valid());
        assert!(bad.name().starts_with("InvalidRandomSpec: "));
    }

    // -------------------------------------------------------
    // 3. Unsupported digest is rejected
    // -------------------------------------------------------
    #[test]
    fn test_unsupported_digest_rejected() {
        let factory = software();
        let spec = RandomSpecBuilder::hash(DigestSpec::of(DigestType::Sm3));
        assert!(spec.is_valid());
        assert!(!factory.supports_random_spec(&spec));
        match factory.create_random(&spec) {
            Err(CryptoError::UnsupportedSpec(name)) => assert_eq!(name, "HASH-SM3"),
            other => panic!("expected UnsupportedSpec, got {other:?}"),
        }
    }

    // -------------------------------------------------------
    // 4. Reseed interval exhaustion and recovery
    // -------------------------------------------------------
    #[test]
    fn test_reseed_interval_exhaustion() {
        let config = DrbgConfig {
            reseed_interval: 4,
            ..DrbgConfig::default()
        };
        let mut exhausted = hash_drbg(config);
        let mut reference = hash_drbg(config);
        let mut out = [0u8; 32];
        for _ in 0..4 {
            assert!(exhausted.generate(&mut out, None, false).unwrap().is_generated());
            assert!(reference.generate(&mut out, None, false).unwrap().is_generated());
        }

        let mut untouched = [0xEEu8; 32];
        assert_eq!(
            exhausted.generate(&mut untouched, None, false).unwrap(),
            GenerateOutcome::ReseedRequired
        );
        assert_eq!(untouched, [0xEE; 32]);

        // A refused request leaves the state as it was.
        exhausted.reseed(None).unwrap();
        reference.reseed(None).unwrap();
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        assert!(exhausted.generate(&mut a, None, false).unwrap().is_generated());
        assert!(reference.generate(&mut b, None, false).unwrap().is_generated());
        assert_eq!(a, b);
    }

    // -------------------------------------------------------
    // 5. Catalog and factory negotiation
    // -------------------------------------------------------
    #[test]
    fn test_catalog_completeness() {
        let all = RandomSpec::list_all();
        // Only digests that cannot absorb long input are listed as invalid.
        for spec in all.iter().filter(|s| !s.is_valid()) {
            let digest = spec.digest_spec().unwrap();
            assert!(!digest.digest_type().supports_large_data());
        }
        let unique: HashSet<_> = all.iter().cloned().collect();
        assert_eq!(unique.len(), all.len());

        for d in DigestSpec::list_all() {
            assert!(all.contains(&RandomSpecBuilder::hash(d)));
            assert!(all.contains(&RandomSpecBuilder::hmac_resist(d)));
        }
        for len in KeyLength::ALL {
            for k in SymKeySpec::list_all(len) {
                assert!(all.contains(&RandomSpecBuilder::ctr_resist(k)));
                assert!(all.contains(&RandomSpecBuilder::x931(k)));
            }
        }
        assert_eq!(RandomSpecBuilder::list_all(), all);
    }

    #[test]
    fn test_factory_builds_all_supported() {
        let factory = software().with_entropy_source(|| Box::new(FakeEntropy));
        let supported = factory.list_all_supported_random_specs();
        assert!(!supported.is_empty());
        for spec in &supported {
            let mut rng = factory.create_random(spec).unwrap();
            let bytes = rng.generate_bytes(33).unwrap();
            assert_eq!(bytes.len(), 33);
        }
        // Everything else in the catalog is refused.
        for spec in RandomSpec::list_all() {
            if !supported.contains(&spec) {
                assert!(factory.create_random(&spec).is_err());
            }
        }
    }

    #[test]
    fn test_ctr_only_for_aes() {
        let factory = software();
        let camellia = SymKeySpec::new(SymKeyType::Camellia, KeyLength::Len256);
        assert!(factory.provider().supports_sym_key(&SymKeySpec::aes(KeyLength::Len256)));
        assert!(!factory.supports_random_spec(&RandomSpecBuilder::ctr(camellia)));
        let ctr = factory.list_all_supported_random_specs_for(RandomType::Ctr, KeyLength::Len256);
        assert_eq!(
            ctr,
            vec![
                RandomSpecBuilder::ctr(SymKeySpec::aes(KeyLength::Len256)),
                RandomSpecBuilder::ctr_resist(SymKeySpec::aes(KeyLength::Len256)),
            ]
        );
    }

    // -------------------------------------------------------
    // 6. Combined generator
    // -------------------------------------------------------
    #[test]
    fn test_combined_random() {
        let factory = software();
        let x931 = RandomSpecBuilder::x931(SymKeySpec::aes(KeyLength::Len128));
        let hmac = RandomSpecBuilder::hmac(DigestSpec::sha3(DigestLength::Len384));
        let mut rng = factory.create_combined_random(&x931, &hmac).unwrap();
        assert_eq!(rng.label(), "X931-AES-128+HMAC-SHA3-384");
        assert_eq!(rng.algorithm_name(), "AES-128/X9.31+HMAC-SHA3-384/HMAC_DRBG");
        let a = rng.generate_bytes(48).unwrap();
        let b = rng.generate_bytes(48).unwrap();
        assert_ne!(a, b);
    }

    // -------------------------------------------------------
    // 7. Direct construction of the other mechanisms
    // -------------------------------------------------------
    #[test]
    fn test_hmac_and_ctr_direct() {
        let provider = SoftwareProvider;
        let mut hmac = HmacDrbg::new(
            provider.create_digest(&sha256()).unwrap(),
            Box::new(FakeEntropy),
            Some(&b"app"[..]),
            Some(&b"nonce"[..]),
            DrbgConfig::default(),
        )
        .unwrap();
        let aes = SymKeySpec::aes(KeyLength::Len128);
        let mut ctr = CtrDrbg::new(
            aes,
            provider.create_block_cipher(&aes).unwrap(),
            Box::new(FakeEntropy),
            Some(&b"app"[..]),
            Some(&b"nonce"[..]),
            DrbgConfig::default(),
        )
        .unwrap();

        let mut a = [0u8; 64];
        let mut b = [0u8; 64];
        hmac.generate(&mut a, Some(&b"adin"[..]), true).unwrap();
        ctr.generate(&mut b, Some(&b"adin"[..]), true).unwrap();
        assert_ne!(a, b);
        assert_eq!(ctr.algorithm_name(), "AES-128/CTR_DRBG");
    }

    // -------------------------------------------------------
    // 8. rand_core integration and random selection
    // -------------------------------------------------------
    #[test]
    fn test_secure_random_as_rng() {
        let factory = software();
        let mut rng: SecureRandom = factory
            .create_random(&RandomSpecBuilder::ctr_resist(SymKeySpec::aes(KeyLength::Len256)))
            .unwrap();
        let mut buf = [0u8; 1000];
        rng.try_fill_bytes(&mut buf).unwrap();
        assert!(buf.iter().any(|b| *b != 0));
        assert_ne!(rng.try_next_u64().unwrap(), rng.try_next_u64().unwrap());
    }

    #[test]
    fn test_random_selection() {
        let factory = software();
        let mut rng = factory.create_random(&RandomSpecBuilder::hash(sha256())).unwrap();

        let digest = factory.generate_random_digest(&mut rng, true).unwrap();
        assert!(factory.provider().supports_digest(digest.spec()));

        let key = factory
            .generate_random_sym_key(&mut rng, KeyLength::Len192)
            .unwrap();
        assert_eq!(key.spec(), &SymKeySpec::aes(KeyLength::Len192));

        let stream = factory
            .generate_random_stream_key(&mut rng, KeyLength::Len256, true)
            .unwrap();
        assert!(factory.provider().supports_stream_key(stream.spec()));
        assert_eq!(stream.as_bytes().len(), 32);
    }
}
