/// Standard base64 encoding (RFC 4648 alphabet, `=` padding)

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Encode raw bytes. The output is always `4 * ceil(n / 3)` characters long.
pub fn encode(data: &[u8]) -> String {
    let mut encoded = String::with_capacity(data.len().div_ceil(3) * 4);

    for chunk in data.chunks(3) {
        // Short final chunks are zero-filled, then the extra symbols are replaced by '='
        let b0 = chunk[0];
        let b1 = chunk.get(1).copied().unwrap_or(0);
        let b2 = chunk.get(2).copied().unwrap_or(0);

        let symbols = [
            b0 >> 2,
            ((b0 & 0x03) << 4) | (b1 >> 4),
            ((b1 & 0x0f) << 2) | (b2 >> 6),
            b2 & 0x3f,
        ];
        let padding = 3 - chunk.len();

        for (index, symbol) in symbols.iter().enumerate() {
            if index >= 4 - padding {
                encoded.push('=');
            } else {
                encoded.push(char::from(ALPHABET[usize::from(*symbol)]));
            }
        }
    }

    encoded
}

/// `data:<mime>;base64,<payload>`
pub fn data_uri(mime: &str, data: &[u8]) -> String {
    format!("data:{mime};base64,{}", encode(data))
}
