//! `docs` subcommands: listing, uploads and deletion.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use shared::models::{
    DocumentListResponse, DocumentQuery, DocumentSortField, DocumentState, ProcType, SortOrder,
    UploadDocumentResponse,
};

use super::{AppContext, confirm};

/// Document management commands.
#[derive(Subcommand, Debug)]
pub enum DocsCommand {
    /// List uploaded documents with their processing status
    List(ListArgs),
    /// Upload up to two files for processing
    Upload {
        /// Processing pipeline: `text` (TXT, PDF) or `image` (PPTX, PDF, JPG, PNG)
        #[arg(long, value_parser = parse_file_proc_type)]
        proc_type: ProcType,
        /// Files to upload
        #[arg(required = true, num_args = 1..)]
        files: Vec<PathBuf>,
    },
    /// Upload typed text as a plain document
    AddText {
        /// Document title, also used as the file name
        #[arg(long)]
        title: String,
        /// Document text
        #[arg(long)]
        content: String,
    },
    /// Delete a document
    Delete {
        /// Document identifier
        #[arg(long)]
        doc: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Filters and ordering for `docs list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only show these processing types (text, image, plain)
    #[arg(long = "type", value_name = "TYPE")]
    pub types: Vec<ProcType>,
    /// Only show these states (pending, in-progress, complete, failed)
    #[arg(long = "status", value_name = "STATUS")]
    pub states: Vec<DocumentState>,
    /// Sort field: type, title, date or progress
    #[arg(long, default_value = "date")]
    pub sort: DocumentSortField,
    /// Sort direction: asc or desc
    #[arg(long, default_value = "desc")]
    pub order: SortOrder,
}

impl From<ListArgs> for DocumentQuery {
    fn from(args: ListArgs) -> Self {
        Self {
            types: args.types,
            states: args.states,
            sort: args.sort,
            order: args.order,
        }
    }
}

/// Runs a `docs` subcommand against the signed-in account.
pub async fn run(ctx: &AppContext, command: DocsCommand) -> Result<()> {
    let client = ctx.authenticated_client()?;
    match command {
        DocsCommand::List(args) => {
            let documents = client
                .list_documents()
                .await
                .context("failed to list documents")?;
            render_documents(&documents, &DocumentQuery::from(args));
        }
        DocsCommand::Upload { proc_type, files } => {
            let response = client
                .upload_documents(proc_type, &files)
                .await
                .context("document upload failed")?;
            render_upload(&response);
        }
        DocsCommand::AddText { title, content } => {
            let response = client
                .upload_plain_text(&title, &content)
                .await
                .context("document upload failed")?;
            render_upload(&response);
        }
        DocsCommand::Delete { doc, yes } => {
            if !confirm(&format!("Delete document {doc}?"), yes)? {
                println!("Cancelled.");
                return Ok(());
            }
            let response = client
                .delete_document(doc)
                .await
                .context("failed to delete document")?;
            println!("{}", response.message);
        }
    }
    Ok(())
}

fn parse_file_proc_type(value: &str) -> Result<ProcType, String> {
    match value.parse::<ProcType>()? {
        ProcType::Plain => Err("use `docs add-text` for plain text documents".to_string()),
        other => Ok(other),
    }
}

fn render_upload(response: &UploadDocumentResponse) {
    println!("{}", response.message);
    for document in &response.documents {
        println!(
            "- [{}] {} ({}, {})",
            document.doc_id, document.title, document.extension, document.proc_type
        );
    }
}

fn render_documents(documents: &DocumentListResponse, query: &DocumentQuery) {
    if documents.total() == 0 {
        println!("No documents uploaded yet.");
        return;
    }

    let selected = documents.query(query);
    if selected.is_empty() {
        println!("No documents match the given filters.");
        return;
    }
    for (proc_type, document) in selected {
        println!(
            "- [{}] {} .{} {proc_type} {} (uploaded {})",
            document.id,
            document.title,
            document.extension,
            document.status(),
            document.created_at
        );
    }
}
