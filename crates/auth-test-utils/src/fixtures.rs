//! Key material and token fixtures for tests.
//!
//! The RSA key pair below is a throwaway 2048-bit fixture generated for
//! this test suite. It must never be used outside tests.

use base64::{engine::general_purpose, Engine as _};
use secrecy::SecretBox;

/// Fixture RSA private key, PKCS#8 DER, base64 encoded.
const RSA_PRIVATE_KEY_PKCS8_B64: &str = concat!(
    "MIIEvQIBADANBgkqhkiG9w0BAQEFAASCBKcwggSjAgEAAoIBAQC4DTbhgdRXFkUi0pVtOIjDULdm",
    "+cxjJl08dJKsH07MEbVrjUPu/ig4nBGlK0iARXBfQjpGdB0ZUWD9nFh2Gd0H3waKD9eG/B0VOY93",
    "TAAUA1OjC/EI48tnbjOfVHyj2GRkaHCvtEjW6J8N0tjT2NnC8yUXzIQ2ZQUf3e43KxQ6Hk4+jj5T",
    "lr8h0PwcUTsoZO+WCyHXftJ60y1KVdwBflANwU2M+4Idr+QKCyDCdc3zWLE/7YR9CAm/P8OGaAcT",
    "eCxHW+i4XiDvLdaDoYfQnLUEPDMdufijOF0Kghnqr3zRlaIhx7Yjm12vtQmhGVTBsPCjFDUPepRR",
    "03e7vB95rXZTAgMBAAECggEAEvr14mqXocV/qrgpxcIzRGUiDMINBFqT+eSRraNq5lubKHTAgTh/",
    "oFrj7PMaPnQqwwAa72IRECfWx0Ck1MUVCLdEvt8kXFzKiQJPG7/gMDApo2JbYI3RT6DLPQ6i7eim",
    "bb5hhJUkf9ksceoBB1PRHSwi8qHaLpvbW+5wnwrXwqhpnvy89dNiWBE07kKANbamZpgZEouq4eNV",
    "bKEUlI0SKDuDeCw9As3tf12e/OWZLvtRlWvYxLtxeeoik8ytyMs3J61Yt/Q1x/djiNcA1QMw1fTZ",
    "Qkf+FEY2YElpowSyjUP1zH6lx75T5ZH08ztmlmBcuDWRZ5g8wk708EJOvy97jQKBgQDhXsms+bDE",
    "lRSr7DYDfvG52z371UffRE0Nu03ERBcMHTOhkRrYfEudWTTUfxLIUDbIBeGHU2sPWmk5Wq6FWC8u",
    "dvFqC/J8FTR+XAv7ucpMV5Oj2fZsh2USGCfpFT+2WB59tQlTdKJu05J+2Y8Y7ijFb9RtbGrJljH5",
    "EVWcUCgExwKBgQDRENgr97lQWIS+9syVWHjBNP8fWweuRcMALZIc8XE9CMn8OMv+Ota2uTQlkee0",
    "1waKor6w8tVQZtw9nxK08ajJlYjDcvFm6fPB3TV2bBW+QTW5P2+r1y3Q5y+s4zYtxRHkL10yzz2U",
    "/2e0/NJEF5nar/PKsu1ilcNsoJ5YOjxeFQKBgAaLSRHjwjVDGvGPD1Z0pjI+YoNggxDBm/ctHCn5",
    "zC2G34vuebgVi+CKyZTuB66XXa/bM9xJGM++UVXgAzdOAzi3LXVl2Wmu9/I/W/24PF6RIHFej+BA",
    "4jdvSiFjg5EY5/HAgv/QYDMVo6hZSuVvbPGmuKVgw40M9nCEB1ddoHvbAoGAckyZQwB+qjSa7qST",
    "mRrzef31dTkZa+fsAo7nkTdXR50kgOa0cFvOw7thjSDF4xKkGut7AdbhVMHHq1Dqs05jj0JXsTOI",
    "U1GY2OaNsh7JjGiubIcIEJTmEY4zfHwEROW3MF/MvlibPHieRE7szhlxHiSQTsOgEQP8AcmWiHne",
    "QzkCgYEA0QQPJThWoMnWW0CFn620+jttPVlaw1vIhCObCbOyvwA2UKhGKXk88uEd1x4gmkDZfmxf",
    "nwwfrqAlu291ue7I18X8ovg53CrgG29X+ME4/0A4yBe0/SwOTTIv8hM763V71oVwd5ggxOy4GA+x",
    "sCJObfkg5kKZToBJvCyoeZZNTx4=",
);

/// Matching public key, SPKI PEM.
const RSA_PUBLIC_KEY_PEM: &str = "-----BEGIN PUBLIC KEY-----
MIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8AMIIBCgKCAQEAuA024YHUVxZFItKVbTiI
w1C3ZvnMYyZdPHSSrB9OzBG1a41D7v4oOJwRpStIgEVwX0I6RnQdGVFg/ZxYdhnd
B98Gig/XhvwdFTmPd0wAFANTowvxCOPLZ24zn1R8o9hkZGhwr7RI1uifDdLY09jZ
wvMlF8yENmUFH93uNysUOh5OPo4+U5a/IdD8HFE7KGTvlgsh137SetMtSlXcAX5Q
DcFNjPuCHa/kCgsgwnXN81ixP+2EfQgJvz/DhmgHE3gsR1vouF4g7y3Wg6GH0Jy1
BDwzHbn4ozhdCoIZ6q980ZWiIce2I5tdr7UJoRlUwbDwoxQ1D3qUUdN3u7wfea12
UwIDAQAB
-----END PUBLIC KEY-----
";

/// Fixture RSA private key as PKCS#8 DER.
pub fn rsa_private_key_pkcs8() -> SecretBox<Vec<u8>> {
    let der = general_purpose::STANDARD
        .decode(RSA_PRIVATE_KEY_PKCS8_B64)
        .expect("fixture key is valid base64");
    SecretBox::new(Box::new(der))
}

/// Fixture RSA public key as PEM.
pub fn rsa_public_key_pem() -> String {
    RSA_PUBLIC_KEY_PEM.to_string()
}

/// Fixture shared secret for HS256 tests (32 bytes).
pub fn hmac_shared_secret() -> SecretBox<Vec<u8>> {
    SecretBox::new(Box::new(b"0123456789abcdef0123456789abcdef".to_vec()))
}

/// A different shared secret, for wrong-key tests.
pub fn other_hmac_shared_secret() -> SecretBox<Vec<u8>> {
    SecretBox::new(Box::new(b"fedcba9876543210fedcba9876543210".to_vec()))
}

/// Hash a client secret for seeding test stores.
///
/// Uses a minimal bcrypt cost so test setup stays fast; production hashing
/// goes through `auth_service::crypto::hash_client_secret` with bounded
/// costs.
pub fn test_secret_hash(secret: &str) -> String {
    bcrypt::hash(secret, 4).expect("bcrypt hashing of test secret")
}

/// Flip one bit inside the decoded bytes of segment `index` of a compact
/// token, re-encode, and reassemble. Produces a structurally valid token
/// whose signature no longer holds.
pub fn flip_bit_in_segment(token: &str, index: usize) -> String {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    let mut segments: Vec<String> = token.split('.').map(|s| s.to_string()).collect();
    let segment = segments.get(index).expect("segment index in range");
    let mut bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .expect("segment is valid base64url");
    let byte = bytes.first_mut().expect("segment is non-empty");
    *byte ^= 0x01;
    segments[index] = URL_SAFE_NO_PAD.encode(&bytes);
    segments.join(".")
}

/// Assemble a compact token from raw header/claims JSON and signature
/// bytes, without any signing. For forgery tests.
pub fn forge_token(header_json: &str, claims_json: &str, signature: &[u8]) -> String {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    format!(
        "{}.{}.{}",
        URL_SAFE_NO_PAD.encode(header_json.as_bytes()),
        URL_SAFE_NO_PAD.encode(claims_json.as_bytes()),
        URL_SAFE_NO_PAD.encode(signature),
    )
}
