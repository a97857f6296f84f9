#![no_main]

use libfuzzer_sys::fuzz_target;
use steam_query_protocol::reassemble_packet;
use steam_query_protocol::utils::compression::CompressionInfo;

fuzz_target!(|data: &[u8]| {
    // First byte picks the fragment size, the rest is split into fragments
    let Some((&size, body)) = data.split_first() else {
        return;
    };
    let fragments: Vec<&[u8]> = body.chunks(usize::from(size).max(1)).collect();

    let _ = reassemble_packet(&fragments, None);
    let _ = reassemble_packet(&fragments, Some(CompressionInfo::new(u16::from(size) << 4, 0)));
});
