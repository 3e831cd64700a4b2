use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use serde_json::json;
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::SupabaseClient;

use crate::models::{ClientError, CreateDocumentRequest, Document};
use crate::services::client::search_term;

pub struct DocumentService {
    supabase: Arc<SupabaseClient>,
}

impl DocumentService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
        }
    }

    pub async fn create_document(&self, request: CreateDocumentRequest, uploaded_by: i64) -> Result<Document, ClientError> {
        if request.title.trim().is_empty() || request.document_type.trim().is_empty() {
            return Err(ClientError::Validation("title and document_type are required".to_string()));
        }

        let document: Document = self
            .supabase
            .insert(
                "documents",
                json!({
                    "client_id": request.client_id,
                    "document_type": request.document_type,
                    "title": request.title.trim(),
                    "file_path": request.file_path,
                    "uploaded_at": Utc::now().to_rfc3339(),
                    "uploaded_by_user_id": uploaded_by,
                }),
            )
            .await?;

        info!("Document {} recorded for client {}", document.id, document.client_id);
        Ok(document)
    }

    /// Newest first, optionally narrowed by a case-insensitive title match.
    pub async fn list_for_client(&self, client_id: i64, search: Option<&str>) -> Result<Vec<Document>> {
        let mut query = format!("client_id=eq.{}&order=uploaded_at.desc", client_id);
        if let Some(term) = search.and_then(search_term) {
            query.push_str(&format!("&title=ilike.*{}*", term));
        }

        debug!("Listing documents: {}", query);
        self.supabase.select("documents", &query).await
    }

    pub async fn delete_document(&self, document_id: i64) -> Result<(), ClientError> {
        let removed = self
            .supabase
            .delete("documents", &format!("id=eq.{}", document_id))
            .await?;

        if removed == 0 {
            return Err(ClientError::NotFound(format!("Document {}", document_id)));
        }
        Ok(())
    }
}
