use clap::Args;
use serde_json::json;

use crate::api::format::{PinRequest, PinnedResourcesView};
use crate::cli::client::PinsClient;
use crate::cli::utils::{output_json, output_success};
use crate::cli::OutputFormat;
use crate::types::{ResourceId, ResourceKind};

#[derive(Args, Debug)]
pub struct PinArgs {
    #[arg(long = "document", help = "Document id to pin (repeatable)")]
    pub documents: Vec<ResourceId>,
    #[arg(long = "link", help = "Link id to pin (repeatable)")]
    pub links: Vec<ResourceId>,
    #[arg(long = "file", help = "File id to pin (repeatable)")]
    pub files: Vec<ResourceId>,
}

impl PinArgs {
    /// Flags that were not given stay absent so the server leaves those kinds alone
    pub fn into_request(self) -> PinRequest {
        let present = |ids: Vec<ResourceId>| if ids.is_empty() { None } else { Some(ids) };
        PinRequest {
            document: present(self.documents),
            link: present(self.links),
            file: present(self.files),
        }
    }
}

#[derive(Args, Debug)]
pub struct UnpinArgs {
    #[arg(help = "Resource id")]
    pub id: ResourceId,
    #[arg(long = "type", help = "Resource type: document, link or file")]
    pub resource_type: ResourceKind,
}

pub async fn list(client: &PinsClient, output_format: OutputFormat) -> anyhow::Result<()> {
    let view = client.list().await?;
    print_view(&view, output_format)
}

pub async fn pin(client: &PinsClient, args: PinArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let request = args.into_request();
    if request == PinRequest::default() {
        anyhow::bail!("nothing to pin; pass --document, --link or --file");
    }
    let view = client.pin(&request).await?;
    print_view(&view, output_format)
}

pub async fn unpin(client: &PinsClient, args: UnpinArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let reply = client.unpin(args.id, args.resource_type).await?;
    output_success(&output_format, &reply.message, Some(json!({ "id": args.id, "resource_type": args.resource_type })))
}

fn print_view(view: &PinnedResourcesView, output_format: OutputFormat) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => output_json(view),
        OutputFormat::Text => {
            if view.is_empty() {
                println!("Nothing pinned yet");
                return Ok(());
            }
            for document in &view.document {
                println!("document {:>6}  {}", document.id, document.title);
            }
            for link in &view.link {
                println!("link     {:>6}  {} <{}>", link.id, link.title, link.link);
            }
            for file in &view.file {
                println!("file     {:>6}  {}", file.id, file.file_name);
            }
            Ok(())
        }
    }
}
