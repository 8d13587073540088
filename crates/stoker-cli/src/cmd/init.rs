use crate::root;
use anyhow::Context;
use std::path::{Path, PathBuf};
use stoker_core::catalog::Catalog;

/// The catalog scaffolded by `stoker init`: the stock corpus-processing
/// action set. Every entry must pass the load-time invariants.
const STOCK_CATALOG: &str = r#"# Catalog of backend jobs an operator can trigger with `stoker trigger`.
# Scheduling, execution, retries, and status reporting live in the backend
# and its dashboard; this file only declares what can be submitted.
backend: http://localhost:5000

actions:
  - name: start_digest
    label: Digest
    namespace: all
    description: >-
      Prepare the backend by digesting all of the applicable content in the
      specified corpus. A necessary first step.
    key: start_digest
    chain: false

  - name: convert_ms_to_pdfs
    label: Convert MS to PDFs
    namespace: ms_word
    description: Process MS documents by converting them to PDFs.
    key:
      - action: doc_to_pdf_supervisor_digest
      - action: docx_to_pdf_supervisor_digest
    chain: true

  - name: split_pdfs
    label: Split PDFs
    namespace: ms_word
    description: Split multi-page PDFs into per-page documents.
    key:
      - action: split_pdfs_supervisor_digest
    chain: true

  - name: find_pdf_type
    label: Determine type of PDF
    namespace: ms_word
    description: Determine if a PDF is scanned or born-digital.
    key:
      - action: find_pdf_type_supervisor_digest
    chain: true

  - name: pdf_to_images
    label: Convert PDF to images
    namespace: ms_word
    description: Convert PDFs to images.
    key:
      - action: pdf_to_image_supervisor_digest
    chain: true

  - name: visualize
    label: Visualize a specific PDF or image
    namespace: pdfs
    description: Pull up a specific file from the corpus in LabelStudio.
    key: show_me_in_labelstudio
    chain: false
    kwargs:
      query: 'match (d:File) where d.nodeID = "{nodeID}" return d.nodeID as nodeID, d.corpusPath as file, d.fileExtension as extension, d.originalPath as originalPath'
      title: 'visualize {nodeID}'
    parameters: [api, nodeID, configuration]

  - name: upload_to_labelstudio
    label: Upload a corpus to LabelStudio
    namespace: all
    description: Upload a corpus (in JSONL format) to LabelStudio to label.
    key: upload_to_labelstudio
    chain: false
    parameters: [jsonl, api, title, configuration]
"#;

pub fn run(explicit: Option<&Path>) -> anyhow::Result<()> {
    let path = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(root::CATALOG_FILE));

    if path.exists() {
        println!("exists:  {}", path.display());
        return Ok(());
    }

    Catalog::parse(STOCK_CATALOG).context("stock catalog is malformed")?;
    std::fs::write(&path, STOCK_CATALOG)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("created: {}", path.display());
    println!("Next: stoker list");
    Ok(())
}
