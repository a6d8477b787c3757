use bancho_protocol::protocol::{PacketType, Payload, Role};
use bancho_protocol::types::{Message, ReplayAction, ReplayFrame, ReplayFrameBundle};
use bancho_protocol::utils::Metrics;
use bancho_protocol::{read_many_packets, select_latest_client, ProtocolVariant};
use std::sync::Arc;

fn frames(count: usize) -> ReplayFrameBundle {
    ReplayFrameBundle {
        frames: (0..count)
            .map(|i| ReplayFrame {
                x: i as f32,
                y: 384.0 - i as f32,
                time: i as i32 * 16,
                ..Default::default()
            })
            .collect(),
        action: ReplayAction::Standard,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_encode_decode_heavy() {
    use tokio::task::JoinSet;

    let iterations = 2_000usize;
    let frame_counts = [0usize, 1, 16, 128, 512];
    let metrics = Arc::new(Metrics::new());
    let server: Arc<ProtocolVariant> = Arc::new(select_latest_client().with_sink(metrics.clone()));
    let client: Arc<ProtocolVariant> = Arc::new(
        select_latest_client()
            .with_role(Role::Client)
            .with_sink(metrics.clone()),
    );

    let mut tasks = JoinSet::new();
    for &count in &frame_counts {
        let server = server.clone();
        let client = client.clone();
        tasks.spawn(async move {
            let bundle = frames(count);
            for i in 0..iterations {
                let payloads = [
                    Payload::SpectateFrames(bundle.clone()),
                    Payload::Message(Message::new("peppy", format!("{i}"), "#osu", 2)),
                ];
                let wire = server.write_many(&payloads).unwrap();
                let batch = read_many_packets(&client, &wire);
                assert!(batch.is_complete());
                assert_eq!(batch.packets.len(), 2);
                assert_eq!(batch.packets[0].0, PacketType::BanchoSpectateFrames);
                assert_eq!(batch.packets[0].1, payloads[0]);
            }
        });
    }

    while let Some(res) = tasks.join_next().await {
        res.unwrap();
    }

    let snapshot = metrics.snapshot();
    let expected = (frame_counts.len() * iterations * 2) as u64;
    assert_eq!(snapshot.packets_written, expected);
    assert_eq!(snapshot.packets_read, expected);
    assert_eq!(snapshot.read_errors, 0);
}
