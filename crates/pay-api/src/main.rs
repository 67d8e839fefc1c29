//! # payments-relay
//!
//! Checkout sessions in, payment events out.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export PORT=3003
//! export STRIPE_SECRET_KEY=sk_test_...
//! export STRIPE_WEBHOOK_SECRET=whsec_...
//! export STRIPE_SUCCESS_URL=http://localhost:3003/payments/success
//! export STRIPE_CANCEL_URL=http://localhost:3003/payments/cancel
//! export NATS_SERVERS=nats://localhost:4222
//!
//! # Run the server
//! payments-relay
//! ```

use pay_api::{routes, AppConfig, AppState};
use pay_bus::NatsEventSink;
use pay_core::{BoxedEventSink, BoxedPaymentStrategy, LoggingEventSink, SinkKind};
use pay_stripe::StripeCheckoutStrategy;
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing(
        std::env::var("ENVIRONMENT")
            .map(|env| env == "production")
            .unwrap_or(false),
    );

    // Nothing binds until every setting has been validated.
    let config = AppConfig::from_env().map_err(|e| {
        error!("{}", e);
        e
    })?;

    let strategy: BoxedPaymentStrategy =
        Arc::new(StripeCheckoutStrategy::new(config.stripe.clone())?);

    let nats = pay_bus::connect(&config.nats).await?;

    let sink: BoxedEventSink = match config.event_sink {
        SinkKind::Nats => Arc::new(NatsEventSink::new(nats.clone())),
        SinkKind::Log => Arc::new(LoggingEventSink),
    };

    info!("Environment: {}", config.environment);
    info!("Payment provider: {}", strategy.provider_name());
    info!("Event sink: {}", sink.name());

    let rpc_client = nats.clone();
    let nats_config = config.nats.clone();
    let rpc_strategy = strategy.clone();
    tokio::spawn(async move {
        if let Err(e) =
            pay_bus::serve_payment_sessions(rpc_client, &nats_config, rpc_strategy).await
        {
            error!("Payment session RPC stopped: {}", e);
        }
    });

    let addr = config.socket_addr();
    let state = AppState::new(config, strategy, sink);
    let app = routes::create_router(state);

    info!("payments-relay listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Flush anything still queued for the bus before exiting.
    if let Err(e) = nats.flush().await {
        error!("NATS flush failed: {}", e);
    }

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    let (json_layer, text_layer) = if json {
        (Some(fmt::layer().json()), None)
    } else {
        (None, Some(fmt::layer()))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
