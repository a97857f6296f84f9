#![no_main]

use libfuzzer_sys::fuzz_target;
use steam_query_protocol::utils::compression::{compress, decompress, decompress_verified, CompressionInfo};

fuzz_target!(|data: &[u8]| {
    // Round trip through bzip2 with the exact declared size
    if data.len() <= usize::from(u16::MAX) {
        let compressed = compress(data).expect("compression of in-memory data");
        let decompressed = decompress(&compressed, data.len()).ok();
        assert_eq!(decompressed.as_deref(), Some(data));
    }

    // Malformed streams must fail cleanly, whatever size they claim
    let declared = data.first().map_or(0, |&b| usize::from(b) * 64);
    let _ = decompress(data, declared);
    let _ = decompress_verified(data, &CompressionInfo::new(declared as u16, 0));
});
