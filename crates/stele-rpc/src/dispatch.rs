//! Method-name dispatch and JSON shaping.
//!
//! Quantities render as minimal `0x`-hex, data as even-length `0x`-hex,
//! per Ethereum JSON-RPC conventions, so existing tooling can point at a
//! Stele node unchanged.

use crate::api::NodeApi;
use crate::error::RpcError;
use crate::protocol::{RpcRequest, RpcResponse};
use serde_json::{json, Value};
use stele_core::encoding::{decode_data, decode_quantity, encode_data, encode_quantity};
use stele_core::{Address, Block, NodeConfig, Receipt, TransactionRequest, TransactionView, TxHash};
use tracing::debug;

/// Handle one raw request body, shielding the caller from parse failures.
pub async fn handle_payload(api: &dyn NodeApi, config: &NodeConfig, body: &str) -> Value {
    let response = match serde_json::from_str::<RpcRequest>(body) {
        Ok(request) => dispatch(api, config, request).await,
        Err(err) => RpcResponse::failure(Value::Null, RpcError::parse_error(err.to_string())),
    };
    serde_json::to_value(response).unwrap_or_else(|err| {
        json!({
            "jsonrpc": "2.0",
            "id": null,
            "error": { "code": crate::error::INTERNAL_ERROR, "message": err.to_string() },
        })
    })
}

/// Dispatch one parsed request.
pub async fn dispatch(api: &dyn NodeApi, config: &NodeConfig, request: RpcRequest) -> RpcResponse {
    if request.jsonrpc != "2.0" {
        return RpcResponse::failure(
            request.id,
            RpcError::invalid_request(format!("unsupported jsonrpc version {:?}", request.jsonrpc)),
        );
    }
    debug!(method = %request.method, "rpc dispatch");
    match call_method(api, config, &request.method, &request.params).await {
        Ok(result) => RpcResponse::success(request.id, result),
        Err(err) => RpcResponse::failure(request.id, err),
    }
}

async fn call_method(
    api: &dyn NodeApi,
    config: &NodeConfig,
    method: &str,
    params: &Value,
) -> Result<Value, RpcError> {
    match method {
        "web3_clientVersion" => Ok(json!(config.client_version)),
        "net_version" => Ok(json!(config.network_id.to_string())),
        "eth_chainId" => Ok(json!(encode_quantity(config.chain_id as u128))),
        "eth_blockNumber" => {
            let height = api.height().await?;
            Ok(json!(encode_quantity(height as u128)))
        }
        "eth_getBlockByNumber" => {
            let head = api.height().await?;
            let number = block_number_param(require(params, 0, "block number")?, head)?;
            let include_tx = param(params, 1).and_then(Value::as_bool).unwrap_or(false);
            let block = api.block_by_number(number).await?;
            Ok(block.map_or(Value::Null, |block| block_to_json(&block, include_tx)))
        }
        "eth_getTransactionByHash" => {
            let hash = tx_hash_param(require(params, 0, "transaction hash")?)?;
            let view = api.transaction(hash).await?;
            Ok(view.map_or(Value::Null, |view| transaction_to_json(&view)))
        }
        "eth_getTransactionReceipt" => {
            let hash = tx_hash_param(require(params, 0, "transaction hash")?)?;
            let receipt = api.receipt(hash).await?;
            Ok(receipt.map_or(Value::Null, |receipt| receipt_to_json(&receipt)))
        }
        "eth_sendTransaction" => {
            let request = transaction_request_param(require(params, 0, "transaction object")?)?;
            let hash = api.send_transaction(request).await?;
            Ok(json!(hash.to_string()))
        }
        "eth_sendRawTransaction" => {
            let raw = data_param(require(params, 0, "raw transaction")?)?;
            let hash = api.send_raw_transaction(raw).await?;
            Ok(json!(hash.to_string()))
        }
        "eth_call" => {
            let call = require(params, 0, "call object")?;
            let to = match call.get("to") {
                Some(value) if !value.is_null() => Some(address_param(value)?),
                _ => None,
            };
            let code = match to {
                Some(address) => api.code(address).await?,
                None => Vec::new(),
            };
            Ok(json!(encode_data(&code)))
        }
        "eth_accounts" => {
            let accounts = api.accounts().await?;
            let rendered: Vec<String> = accounts.iter().map(Address::to_string).collect();
            Ok(json!(rendered))
        }
        "eth_getBalance" => {
            let address = address_param(require(params, 0, "address")?)?;
            let account = api.account(address).await?;
            Ok(json!(encode_quantity(account.balance)))
        }
        "eth_getCode" => {
            let address = address_param(require(params, 0, "address")?)?;
            let code = api.code(address).await?;
            Ok(json!(encode_data(&code)))
        }
        "evm_mine" => {
            api.mine().await?;
            Ok(json!("0x0"))
        }
        other => Err(RpcError::method_not_found(other)),
    }
}

fn param<'a>(params: &'a Value, index: usize) -> Option<&'a Value> {
    params.as_array().and_then(|array| array.get(index))
}

fn require<'a>(params: &'a Value, index: usize, what: &str) -> Result<&'a Value, RpcError> {
    param(params, index).ok_or_else(|| RpcError::invalid_params(format!("missing {what}")))
}

fn address_param(value: &Value) -> Result<Address, RpcError> {
    let text = value
        .as_str()
        .ok_or_else(|| RpcError::invalid_params("address must be a hex string"))?;
    text.parse()
        .map_err(|err| RpcError::invalid_params(format!("{err}")))
}

fn tx_hash_param(value: &Value) -> Result<TxHash, RpcError> {
    let text = value
        .as_str()
        .ok_or_else(|| RpcError::invalid_params("hash must be a hex string"))?;
    text.parse()
        .map_err(|err| RpcError::invalid_params(format!("{err}")))
}

fn data_param(value: &Value) -> Result<Vec<u8>, RpcError> {
    let text = value
        .as_str()
        .ok_or_else(|| RpcError::invalid_params("data must be a hex string"))?;
    decode_data(text).map_err(|err| RpcError::invalid_params(format!("{err}")))
}

/// Quantities arrive as hex strings; bare JSON numbers are tolerated.
fn quantity_param(value: &Value) -> Result<u128, RpcError> {
    if let Some(number) = value.as_u64() {
        return Ok(number as u128);
    }
    let text = value
        .as_str()
        .ok_or_else(|| RpcError::invalid_params("quantity must be a hex string"))?;
    decode_quantity(text).map_err(|err| RpcError::invalid_params(format!("{err}")))
}

/// `latest` and `pending` resolve to the head, `earliest` to genesis.
fn block_number_param(value: &Value, head: u64) -> Result<u64, RpcError> {
    match value.as_str() {
        Some("latest") | Some("pending") => Ok(head),
        Some("earliest") => Ok(0),
        _ => {
            let number = quantity_param(value)?;
            u64::try_from(number)
                .map_err(|_| RpcError::invalid_params("block number out of range"))
        }
    }
}

fn transaction_request_param(value: &Value) -> Result<TransactionRequest, RpcError> {
    let object = value
        .as_object()
        .ok_or_else(|| RpcError::invalid_params("transaction must be an object"))?;
    let from = address_param(
        object
            .get("from")
            .ok_or_else(|| RpcError::invalid_params("missing from"))?,
    )?;
    let to = match object.get("to") {
        Some(value) if !value.is_null() => Some(address_param(value)?),
        _ => None,
    };
    let value_field = match object.get("value") {
        Some(value) => quantity_param(value)?,
        None => 0,
    };
    let gas = match object.get("gas") {
        Some(value) => u64::try_from(quantity_param(value)?)
            .map_err(|_| RpcError::invalid_params("gas out of range"))?,
        None => 0,
    };
    let gas_price = match object.get("gasPrice") {
        Some(value) => quantity_param(value)?,
        None => 0,
    };
    let input = match object.get("input").or_else(|| object.get("data")) {
        Some(value) if !value.is_null() => data_param(value)?,
        _ => Vec::new(),
    };
    Ok(TransactionRequest {
        from,
        to,
        value: value_field,
        gas,
        gas_price,
        input,
    })
}

fn block_to_json(block: &Block, include_tx: bool) -> Value {
    let transactions: Vec<Value> = if include_tx {
        block
            .transactions
            .iter()
            .enumerate()
            .map(|(index, tx)| {
                transaction_to_json(&TransactionView::included(
                    tx.clone(),
                    block.number,
                    block.hash,
                    index as u64,
                ))
            })
            .collect()
    } else {
        block
            .transactions
            .iter()
            .map(|tx| json!(tx.hash.to_string()))
            .collect()
    };
    json!({
        "number": encode_quantity(block.number as u128),
        "hash": block.hash.to_string(),
        "parentHash": block.parent_hash.to_string(),
        "timestamp": encode_quantity(block.timestamp as u128),
        "miner": block.miner.to_string(),
        "difficulty": encode_quantity(block.difficulty as u128),
        "gasUsed": encode_quantity(block.gas_used as u128),
        "gasLimit": encode_quantity(block.gas_limit as u128),
        "size": encode_quantity(block.size as u128),
        "transactions": transactions,
    })
}

fn transaction_to_json(view: &TransactionView) -> Value {
    let tx = &view.transaction;
    json!({
        "hash": tx.hash.to_string(),
        "from": tx.from.to_string(),
        "to": tx.to.map(|addr| addr.to_string()),
        "value": encode_quantity(tx.value),
        "gas": encode_quantity(tx.gas as u128),
        "gasPrice": encode_quantity(tx.gas_price),
        "input": encode_data(&tx.input),
        "nonce": encode_quantity(tx.nonce as u128),
        "blockNumber": view.block_number.map(|n| encode_quantity(n as u128)),
        "blockHash": view.block_hash.map(|h| h.to_string()),
        "transactionIndex": view.transaction_index.map(|i| encode_quantity(i as u128)),
    })
}

fn receipt_to_json(receipt: &Receipt) -> Value {
    json!({
        "transactionHash": receipt.transaction_hash.to_string(),
        "transactionIndex": encode_quantity(receipt.transaction_index as u128),
        "blockNumber": encode_quantity(receipt.block_number as u128),
        "blockHash": receipt.block_hash.to_string(),
        "from": receipt.from.to_string(),
        "to": receipt.to.map(|addr| addr.to_string()),
        "contractAddress": receipt.contract_address.map(|addr| addr.to_string()),
        "gasUsed": encode_quantity(receipt.gas_used as u128),
        "status": encode_quantity(receipt.status as u128),
        "logs": [],
    })
}
