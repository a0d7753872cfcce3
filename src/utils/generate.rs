use rand::Rng;

const REFERRAL_CODE_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
pub const REFERRAL_CODE_LEN: usize = 8;

pub fn generate_referral_code() -> String {
    let mut rng = rand::thread_rng();
    (0..REFERRAL_CODE_LEN)
        .map(|_| REFERRAL_CODE_CHARS[rng.gen_range(0..REFERRAL_CODE_CHARS.len())] as char)
        .collect()
}

pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
