//! Line-oriented text protocol over a [`SymbolDirectory`].
//!
//! This is the request/response surface the external TCP front-end
//! drives; the front-end owns sockets and framing, this module owns the
//! grammar. One request line in, one response string out, every response
//! newline-terminated.
//!
//! ```text
//! ADD_INSTRUMENT ticker|description|industry|initialPrice
//! REMOVE_INSTRUMENT <symbolId>
//! LIST_INSTRUMENTS
//! ADD <symbolId> <B|S> <L|M> <price> <qty>
//! CANCEL <symbolId> <orderId>
//! SNAPSHOT <symbolId>
//! ```

use crate::{Order, OrderType, Side, SymbolDirectory};

/// Snapshot depth served to protocol clients.
const SNAPSHOT_DEPTH: usize = 10;

/// Handles one request line, returning the full response (levels and
/// terminators included).
pub fn handle_request(directory: &SymbolDirectory, request: &str) -> String {
    let request = request.trim();
    let mut tokens = request.split_whitespace();
    let Some(cmd) = tokens.next() else {
        return "ERROR Unknown command\n".to_string();
    };

    match cmd {
        "ADD_INSTRUMENT" => {
            // The payload is pipe-separated and may contain spaces.
            let payload = request[cmd.len()..].trim();
            let parts: Vec<&str> = payload.split('|').map(str::trim).collect();
            if parts.len() < 4 {
                return "ERROR Invalid instrument payload\n".to_string();
            }
            let (ticker, description, industry) = (parts[0], parts[1], parts[2]);
            let Ok(initial_price) = parts[3].parse::<f64>() else {
                return "ERROR Invalid initial price\n".to_string();
            };
            if ticker.is_empty() || initial_price <= 0.0 {
                return "ERROR Invalid ticker\n".to_string();
            }
            let symbol_id = directory.add_instrument(ticker, description, industry, initial_price);
            format!("OK {}\n", symbol_id)
        }

        "REMOVE_INSTRUMENT" => {
            let Some(symbol_id) = tokens.next().and_then(|t| t.parse().ok()) else {
                return "ERROR Instrument not found\n".to_string();
            };
            if directory.remove_instrument(symbol_id) {
                "OK\n".to_string()
            } else {
                "ERROR Instrument not found\n".to_string()
            }
        }

        "LIST_INSTRUMENTS" => {
            let instruments = directory.list_instruments();
            let mut out = format!("INSTRUMENTS {}\n", instruments.len());
            for inst in instruments {
                out.push_str(&format!(
                    "{}|{}|{}|{}|{}\n",
                    inst.symbol_id, inst.ticker, inst.description, inst.industry, inst.initial_price
                ));
            }
            out.push_str("END\n");
            out
        }

        "ADD" => {
            let Some(symbol_id) = tokens.next().and_then(|t| t.parse().ok()) else {
                return "ERROR Instrument not found\n".to_string();
            };
            let side = match tokens.next() {
                Some("B") => Side::Buy,
                Some("S") => Side::Sell,
                _ => return "ERROR Invalid side\n".to_string(),
            };
            let order_type = match tokens.next() {
                Some("L") => OrderType::Limit,
                Some("M") => OrderType::Market,
                _ => return "ERROR Invalid order type\n".to_string(),
            };
            let (Some(price), Some(qty)) = (
                tokens.next().and_then(|t| t.parse::<i64>().ok()),
                tokens.next().and_then(|t| t.parse::<i64>().ok()),
            ) else {
                return "ERROR Invalid price or quantity\n".to_string();
            };

            if !directory.has_instrument(symbol_id) {
                return "ERROR Instrument not found\n".to_string();
            }
            if order_type == OrderType::Limit && price <= 0 {
                return "ERROR Invalid price for LIMIT order (must be > 0)\n".to_string();
            }
            if qty <= 0 {
                return "ERROR Invalid quantity (must be > 0)\n".to_string();
            }

            let order_id = directory.next_order_id();
            let order = match order_type {
                OrderType::Limit => Order::limit(order_id, symbol_id, side, price, qty),
                OrderType::Market => Order::market(order_id, symbol_id, side, qty),
            };

            match directory.submit(order) {
                Ok(()) => format!("OK {}\n", order_id),
                Err(_) => "ERROR Failed to submit order (queue full or validation failed)\n"
                    .to_string(),
            }
        }

        "CANCEL" => {
            let (Some(symbol_id), Some(order_id)) = (
                tokens.next().and_then(|t| t.parse().ok()),
                tokens.next().and_then(|t| t.parse().ok()),
            ) else {
                return "NOTFOUND\n".to_string();
            };
            match directory.cancel(symbol_id, order_id) {
                Ok(()) => "OK\n".to_string(),
                Err(_) => "NOTFOUND\n".to_string(),
            }
        }

        "SNAPSHOT" => {
            let Some(symbol_id) = tokens.next().and_then(|t| t.parse().ok()) else {
                return "ERROR Instrument not found\n".to_string();
            };
            if !directory.has_instrument(symbol_id) {
                return "ERROR Instrument not found\n".to_string();
            }

            let bids = directory.snapshot_bids(symbol_id, SNAPSHOT_DEPTH);
            let asks = directory.snapshot_asks(symbol_id, SNAPSHOT_DEPTH);

            let mut out = format!("SNAPSHOT {}\n", symbol_id);
            out.push_str(&format!("BIDS {}\n", bids.len()));
            for level in &bids {
                out.push_str(&format!("{} {} {}\n", level.price, level.total, level.num_orders));
            }
            out.push_str(&format!("ASKS {}\n", asks.len()));
            for level in &asks {
                out.push_str(&format!("{} {} {}\n", level.price, level.total, level.num_orders));
            }
            out.push_str("END\n");
            out
        }

        _ => "ERROR Unknown command\n".to_string(),
    }
}
