/// Low byte of each 16-bit unit, up to the first zero unit or the end of
/// `units`. These are the exact bytes the vendor tools use for names.
pub fn decode_bytes(units: &[u16]) -> Vec<u8> {
    units
        .iter()
        .take_while(|&&unit| unit != 0)
        .map(|&unit| (unit & 0xFF) as u8)
        .collect()
}

/// Displayable form of [`decode_bytes`], one char per byte.
///
/// Bytes above 0x7F become two-byte UTF-8 here, so this must not be used
/// to build file names.
pub fn decode_text(units: &[u16]) -> String {
    decode_bytes(units).into_iter().map(char::from).collect()
}
