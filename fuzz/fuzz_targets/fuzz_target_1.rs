#![no_main]

use bancho_protocol::protocol::Role;
use bancho_protocol::utils::NoopSink;
use bancho_protocol::{read_many_packets, select_client};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

fuzz_target!(|data: &[u8]| {
    // Frame parsing must never panic, for either revision or role
    for version in [282, 490] {
        for role in [Role::Server, Role::Client] {
            if let Ok(variant) = select_client(version) {
                let variant = variant.with_role(role).with_sink(Arc::new(NoopSink));
                let _ = read_many_packets(&variant, data);
            }
        }
    }
});
