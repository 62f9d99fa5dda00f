//! Interactive command-line front-end driving a single engine.
//!
//! ```text
//! add <B|S> <L|M> [price] <qty>
//! cancel <id>
//! snap
//! q
//! ```

use std::io::{self, BufRead, Write};

use rust_matching_engine::{EngineEvent, Order, OrderId, Side, SymbolEngine};

fn main() {
    env_logger::init();

    let engine = SymbolEngine::new();
    engine.set_event_callback(Box::new(|event| match event {
        EngineEvent::Ack { order_id, .. } => println!("ACK: orderId={}", order_id),
        EngineEvent::Trade { trade, .. } => println!(
            "TRADE: maker={} taker={} price={} qty={}",
            trade.maker_id, trade.taker_id, trade.price, trade.quantity
        ),
        EngineEvent::CancelAck { order_id, .. } => println!("CANCEL_ACK: orderId={}", order_id),
        EngineEvent::CancelReject { order_id, .. } => {
            println!("CANCEL_REJECT: orderId={}", order_id)
        }
        EngineEvent::Reject { order_id, .. } => println!("REJECT: orderId={}", order_id),
    }));
    engine.start();

    println!("OrderBook CLI (q to quit)");
    let stdin = io::stdin();
    let mut next_id: OrderId = 1;

    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let mut tokens = line.split_whitespace();
        let Some(cmd) = tokens.next() else { continue };

        if cmd == "q" {
            break;
        }

        // Drain anything the matcher published since the last command.
        engine.process_events();

        match cmd {
            "add" => {
                let side = match tokens.next() {
                    Some("B") => Side::Buy,
                    Some("S") => Side::Sell,
                    _ => {
                        println!("unknown");
                        continue;
                    }
                };
                let is_market = match tokens.next() {
                    Some("L") => false,
                    Some("M") => true,
                    _ => {
                        println!("unknown");
                        continue;
                    }
                };
                let price = if is_market {
                    0
                } else {
                    match tokens.next().and_then(|t| t.parse().ok()) {
                        Some(p) => p,
                        None => {
                            println!("unknown");
                            continue;
                        }
                    }
                };
                let Some(qty) = tokens.next().and_then(|t| t.parse().ok()) else {
                    println!("unknown");
                    continue;
                };

                let order_id = next_id;
                next_id += 1;
                let order = if is_market {
                    Order::market(order_id, 1, side, qty)
                } else {
                    Order::limit(order_id, 1, side, price, qty)
                };

                match engine.submit(order) {
                    Ok(()) => println!("SUBMITTED"),
                    Err(_) => println!("QUEUE_FULL"),
                }
            }
            "cancel" => {
                let Some(id) = tokens.next().and_then(|t| t.parse().ok()) else {
                    println!("unknown");
                    continue;
                };
                match engine.cancel(id) {
                    Ok(()) => println!("OK"),
                    Err(_) => println!("NF"),
                }
            }
            "snap" => {
                let bids = engine.snapshot_bids(0);
                let asks = engine.snapshot_asks(0);
                println!("BIDS");
                for level in &bids {
                    println!("{} {} ({})", level.price, level.total, level.num_orders);
                }
                println!("ASKS");
                for level in &asks {
                    println!("{} {} ({})", level.price, level.total, level.num_orders);
                }
            }
            _ => println!("unknown"),
        }
        io::stdout().flush().ok();
    }

    engine.stop();
}
