// src/models/webhook.rs

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

// Formato do evento de contato enviado pelo provedor externo. Tudo que não
// está mapeado aqui é simplesmente ignorado na desserialização; o payload
// completo fica guardado em raw_json.

#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub value: Vec<WebhookEntry>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookEntry {
    pub contact: Option<WebhookContact>,
    #[serde(default)]
    pub custom_fields: HashMap<String, Value>,
    #[serde(default)]
    pub products: Vec<WebhookProduct>,
    pub sales_channel: Option<WebhookChannel>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookContact {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub document: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookProduct {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookChannel {
    pub name: Option<String>,
}
