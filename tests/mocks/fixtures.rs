//! Response bodies in the shape each venue API returns

#![allow(dead_code)]

use serde_json::{json, Value};

pub const ARBITRUM_WETH: &str = "0x82aF49447D8a07e3bd95BD0d56f35241523fBab1";
pub const ARBITRUM_USDC: &str = "0xaf88d065e77c8cC2239327C5EDb3A432268e5831";

/// One ETH in wei
pub const ONE_ETH: &str = "1000000000000000000";

pub fn paraswap_prices(dest_amount: &str, exchange: &str) -> Value {
	json!({
		"priceRoute": {
			"blockNumber": 250000000u64,
			"network": 42161,
			"srcToken": ARBITRUM_WETH,
			"srcDecimals": 18,
			"srcAmount": ONE_ETH,
			"destToken": ARBITRUM_USDC,
			"destDecimals": 6,
			"destAmount": dest_amount,
			"bestRoute": [{
				"percent": 100,
				"swaps": [{
					"srcToken": ARBITRUM_WETH,
					"destToken": ARBITRUM_USDC,
					"swapExchanges": [{
						"exchange": exchange,
						"srcAmount": ONE_ETH,
						"destAmount": dest_amount,
						"percent": 100
					}]
				}]
			}],
			"gasCostUSD": "0.05",
			"side": "SELL"
		}
	})
}

pub fn paraswap_error(code: &str) -> Value {
	json!({ "error": code })
}

pub fn openocean_quote(out_amount: &str, dexes: &[(&str, &str)]) -> Value {
	let dexes: Vec<Value> = dexes
		.iter()
		.enumerate()
		.map(|(index, (code, amount))| {
			json!({ "dexIndex": index, "dexCode": code, "swapAmount": amount })
		})
		.collect();
	json!({
		"code": 200,
		"data": {
			"inToken": { "address": ARBITRUM_WETH, "decimals": 18, "symbol": "WETH" },
			"outToken": { "address": ARBITRUM_USDC, "decimals": 6, "symbol": "USDC" },
			"inAmount": ONE_ETH,
			"outAmount": out_amount,
			"estimatedGas": "210000",
			"dexes": dexes
		}
	})
}

pub fn openocean_error(code: i64, message: &str) -> Value {
	json!({ "code": code, "error": message, "data": null })
}

pub fn zerox_price(buy_amount: &str, source: &str) -> Value {
	json!({
		"blockNumber": "250000000",
		"buyAmount": buy_amount,
		"buyToken": ARBITRUM_USDC,
		"sellAmount": ONE_ETH,
		"sellToken": ARBITRUM_WETH,
		"liquidityAvailable": true,
		"route": {
			"fills": [{ "from": ARBITRUM_WETH, "to": ARBITRUM_USDC, "source": source, "proportionBps": "10000" }]
		}
	})
}

pub fn zerox_no_liquidity() -> Value {
	json!({ "liquidityAvailable": false, "zid": "0x1234" })
}
