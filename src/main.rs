use parley::config::Config;
use parley::domain::bridge::{InboundEvent, SocketBridge};
use parley::domain::call::{CallSessionManager, InboundSignal, OutboundSignal, Participant};
use parley::domain::notification::{MessageArrival, NotificationDeliveryPipeline};
use parley::domain::presentation::select_surface;
use parley::domain::shared::value_objects::{RoomId, UserId};
use parley::infrastructure::bridge::{
    ChannelSocketBridge, OutboundRecord, RelayedIntent, ServiceWorkerBridge, ServiceWorkerHandle,
    WsSocketBridge,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info, warn, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();

    info!("Starting Parley client core");

    // Load configuration
    let config = Config::load("parley.toml")?;
    info!("Configuration loaded: {:?}", config);

    // Socket bridge: real backend when configured, in-process demo otherwise
    let demo_mode = config.socket.url.is_none();
    let (bridge, inbound_rx): (
        Arc<dyn SocketBridge>,
        mpsc::UnboundedReceiver<InboundEvent>,
    ) = match config.socket.url.as_deref() {
        Some(url) => {
            let (bridge, inbound_rx) = WsSocketBridge::connect(url).await?;
            (bridge, inbound_rx)
        }
        None => {
            info!("No socket url configured, running against the demo backend");
            let (bridge, outbound_rx) = ChannelSocketBridge::new();
            let inbound_rx = spawn_demo_backend(outbound_rx);
            (Arc::new(bridge), inbound_rx)
        }
    };

    let calls = Arc::new(CallSessionManager::new(bridge.clone(), config.call.clone()));
    let pipeline = Arc::new(NotificationDeliveryPipeline::new(
        bridge.clone(),
        config.notifications.clone(),
    ));

    let (sw_handle, sw_bridge) = ServiceWorkerBridge::new();

    if demo_mode {
        spawn_demo_actions(calls.clone(), sw_handle.clone());
    }

    run_event_loop(calls, pipeline, inbound_rx, sw_bridge).await;

    info!("Shut down cleanly");
    Ok(())
}

/// The single logical event loop all state transitions run on
async fn run_event_loop(
    calls: Arc<CallSessionManager>,
    pipeline: Arc<NotificationDeliveryPipeline>,
    mut inbound_rx: mpsc::UnboundedReceiver<InboundEvent>,
    mut sw_bridge: ServiceWorkerBridge,
) {
    let mut tick = tokio::time::interval(Duration::from_secs(1));
    let mut surface = select_surface(None, &[]);

    loop {
        tokio::select! {
            _ = tick.tick() => {
                calls.tick_duration();
                calls.handle_timeouts(Instant::now()).await;
                pipeline.handle_timeouts(Instant::now());
            }
            event = inbound_rx.recv() => match event {
                Some(InboundEvent::CallSignal(signal)) => calls.handle_signal(signal).await,
                Some(InboundEvent::MessageArrival(arrival)) => {
                    pipeline.admit(arrival, Instant::now());
                }
                None => {
                    warn!("socket bridge closed, stopping");
                    break;
                }
            },
            Some(intent) = sw_bridge.recv() => match intent {
                RelayedIntent::SendReply { room_id, message } => {
                    if let Err(e) = pipeline.send_reply(&room_id, &message).await {
                        warn!(error = %e, "relayed reply failed");
                    }
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down...");
                break;
            }
        }

        let call = calls.current();
        let notifications = pipeline.visible();
        let next = select_surface(call.as_ref(), &notifications);
        if next != surface {
            info!(surface = ?next, "visible surface changed");
            surface = next;
        }
    }
}

/// Fake remote side for the demo: answers invites and pushes one message
fn spawn_demo_backend(
    mut outbound_rx: mpsc::UnboundedReceiver<OutboundRecord>,
) -> mpsc::UnboundedReceiver<InboundEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let arrival = MessageArrival {
            sender_id: UserId::new("u-carol"),
            message_id: "m-1".to_string(),
            room_id: RoomId::new("room-general"),
            sender_name: "Carol".to_string(),
            avatar_ref: None,
            body: "lunch today?".to_string(),
        };
        // Delivered twice; the pipeline's dedup collapses it to one item
        let _ = tx.send(InboundEvent::MessageArrival(arrival.clone()));
        let _ = tx.send(InboundEvent::MessageArrival(arrival));

        while let Some(record) = outbound_rx.recv().await {
            match record {
                OutboundRecord::Signal(OutboundSignal::Invite { session_ref, .. }) => {
                    info!("demo backend: accepting invite");
                    let _ = tx.send(InboundEvent::CallSignal(InboundSignal::Accept {
                        session_ref,
                    }));
                    let _ = tx.send(InboundEvent::CallSignal(InboundSignal::MediaReady {
                        session_ref,
                    }));
                }
                OutboundRecord::Signal(signal) => {
                    debug!(kind = signal.kind(), "demo backend: signal received");
                }
                OutboundRecord::Message { room_id, body } => {
                    info!(%room_id, %body, "demo backend: message received");
                }
            }
        }
    });

    rx
}

/// Scripted local user for the demo: replies, calls Bob, hangs up
fn spawn_demo_actions(calls: Arc<CallSessionManager>, sw_handle: ServiceWorkerHandle) {
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;

        // Reply relayed from the backgrounded-page channel
        sw_handle.relay(RelayedIntent::SendReply {
            room_id: RoomId::new("room-general"),
            message: "sure, 12:30".to_string(),
        });

        tokio::time::sleep(Duration::from_secs(1)).await;

        let bob = Participant::new(UserId::new("u-bob"), "Bob".to_string(), None);
        if let Err(e) = calls.place_call(bob).await {
            warn!(error = %e, "demo call failed");
            return;
        }

        tokio::time::sleep(Duration::from_secs(5)).await;
        if let Err(e) = calls.hang_up().await {
            warn!(error = %e, "demo hangup failed");
        }
    });
}
