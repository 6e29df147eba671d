use super::{confirm, with_spinner, Output};
use crate::api::{ApiClient, NewCattle};
use crate::capture::{collect_images, encode_image, prepare_uploads};
use crate::cli::CattleCommand;
use crate::error::Result;
use crate::present;
use std::path::{Path, PathBuf};
use titweng_common::{filter_rows, sort_rows, CowUpdate, OwnerTransfer, Registration, SortDirection, TableRow};

fn direction(desc: bool) -> SortDirection {
    if desc {
        SortDirection::Desc
    } else {
        SortDirection::Asc
    }
}

/// 検索語で絞り込み、指定があれば並べ替える
fn select<'a, T: TableRow>(rows: &'a [T], search: Option<&str>, sort: Option<&str>, desc: bool) -> Vec<&'a T> {
    let mut selected = filter_rows(rows, search.unwrap_or(""));
    if let Some(column) = sort {
        sort_rows(&mut selected, column, direction(desc));
    }
    selected
}

pub async fn run(client: &ApiClient, command: CattleCommand, out: &Output) -> Result<()> {
    match command {
        CattleCommand::List { search, sort, desc } => {
            let cows = client.list_cows().await?;
            let selected = select(&cows, search.as_deref(), sort.as_deref(), desc);
            out.emit(&selected, || {
                format!("{}{} of {} cattle\n", present::cow_table(&selected), selected.len(), cows.len())
            })
        }

        CattleCommand::Show { tag } => {
            let cow = client.find_cow(&tag).await?;
            let base_url = client.context().config().base_url().to_string();
            out.emit(&cow, || present::cow_details(&cow, &base_url))
        }

        CattleCommand::Register {
            owner_name,
            owner_email,
            owner_phone,
            owner_address,
            owner_national_id,
            breed,
            color,
            age,
            nose,
            face,
        } => {
            let registration = Registration {
                owner_full_name: owner_name,
                owner_email,
                owner_phone,
                owner_address,
                owner_national_id,
                breed,
                color,
                age,
            };
            register(client, registration, &nose, &face, out).await
        }

        CattleCommand::Update { tag, breed, color, age } => {
            let update = CowUpdate { breed, color, age };
            let response = client.update_cow(&tag, &update).await?;
            out.emit(&response, || {
                format!("✔ {}\n", response.message.clone().unwrap_or_else(|| format!("Updated {}", tag.trim())))
            })
        }

        CattleCommand::Transfer {
            tag,
            name,
            email,
            phone,
            address,
            national_id,
        } => {
            let transfer = OwnerTransfer {
                full_name: name,
                email,
                phone,
                address,
                national_id,
            };
            let response = client.transfer_cow(&tag, &transfer).await?;
            out.emit(&response, || {
                format!(
                    "✔ {}\n",
                    response
                        .message
                        .clone()
                        .unwrap_or_else(|| format!("Transferred {} to {}", tag.trim(), transfer.full_name.trim()))
                )
            })
        }

        CattleCommand::Delete { tag, full, yes } => {
            let prompt = if full {
                format!("Delete {} with owner, verification and report records?", tag.trim())
            } else {
                format!("Delete {}?", tag.trim())
            };
            if !confirm(&prompt, yes)? {
                out.note("Cancelled");
                return Ok(());
            }
            let response = client.delete_cow(&tag, full).await?;
            out.emit(&response, || {
                format!("✔ {}\n", response.message.clone().unwrap_or_else(|| format!("Deleted {}", tag.trim())))
            })
        }

        CattleCommand::NextTag => {
            let info = client.next_tag().await?;
            out.emit(&info, || {
                format!("{}\n", info.next_tag.as_deref().unwrap_or("Loading..."))
            })
        }

        CattleCommand::Face { tag, output } => {
            let bytes = with_spinner("Downloading face image...", client.cow_face(&tag)).await?;
            let path = output.unwrap_or_else(|| PathBuf::from(format!("{}-face.jpg", tag.trim())));
            std::fs::write(&path, &bytes)?;
            out.note(format!("✔ Saved {} ({} bytes)", path.display(), bytes.len()));
            Ok(())
        }
    }
}

async fn register(
    client: &ApiClient,
    registration: Registration,
    nose: &[PathBuf],
    face: &Path,
    out: &Output,
) -> Result<()> {
    let config = client.context().config();
    let nose_paths = collect_images(nose)?;

    // 画像の読み込み前に件数と必須項目を確認
    registration.validate(nose_paths.len(), face.is_file())?;

    let (max_size, quality) = (config.max_image_size, config.jpeg_quality);
    let nose_prints = prepare_uploads(&nose_paths, max_size, quality)?;
    let facial_image = encode_image(face, max_size, quality)?;

    let cattle = NewCattle {
        registration,
        nose_prints,
        facial_image,
    };
    let response = with_spinner("Registering cattle...", client.register_cow(cattle)).await?;

    out.emit(&response, || {
        format!(
            "✔ Cattle registered successfully! Tag: {}\n",
            response.cow_tag.as_deref().unwrap_or("-")
        )
    })
}

pub async fn owners(
    client: &ApiClient,
    search: Option<String>,
    sort: Option<String>,
    desc: bool,
    out: &Output,
) -> Result<()> {
    let owners = client.list_owners().await?;
    let selected = select(&owners, search.as_deref(), sort.as_deref(), desc);
    out.emit(&selected, || {
        format!("{}{} of {} owners\n", present::owner_table(&selected), selected.len(), owners.len())
    })
}
