#![no_main]

use libfuzzer_sys::fuzz_target;
use steam_query_protocol::SteamPacket;

fuzz_target!(|data: &[u8]| {
    // Fuzz datagram decoding through every built-in decoder - test for panics
    let _ = SteamPacket::from_bytes(data);

    let mut datagram = vec![0xFF, 0xFF, 0xFF, 0xFF];
    datagram.extend_from_slice(data);
    let _ = SteamPacket::from_bytes(&datagram);
});
