//! Interactive console menu over a [`LifecycleManager`]

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::services::wallet::LifecycleManager;

const MENU: &str = "\nMonero Temporary Wallet Manager\n\
1. Create new temporary wallet\n\
2. View active wallets\n\
3. Delete a wallet\n\
4. Exit\n";

/// Run the menu until the user exits or input ends
pub async fn run_menu<R, W>(
    manager: &LifecycleManager,
    mut input: R,
    mut output: W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        output.write_all(MENU.as_bytes()).await?;
        let Some(choice) = prompt(&mut input, &mut output, "Enter your choice (1-4): ").await? else {
            break;
        };

        match choice.as_str() {
            "1" => match manager.create_wallet().await {
                Ok(address) => {
                    writeln(&mut output, &format!("Created new temporary wallet: {address}")).await?
                }
                Err(e) => writeln(&mut output, &format!("Failed to create wallet: {e}")).await?,
            },
            "2" => {
                let wallets = manager.list_active().await;
                if wallets.is_empty() {
                    writeln(&mut output, "No active wallets").await?;
                }
                for wallet in wallets {
                    let balance = wallet
                        .balance_xmr
                        .map(|xmr| format!("{xmr} XMR"))
                        .unwrap_or_else(|| "unavailable".to_string());
                    writeln(
                        &mut output,
                        &format!(
                            "\nAddress: {}\nTime remaining: {} minutes\nBalance: {}",
                            wallet.address, wallet.minutes_remaining, balance
                        ),
                    )
                    .await?;
                }
            }
            "3" => {
                let Some(address) =
                    prompt(&mut input, &mut output, "Enter wallet address to delete: ").await?
                else {
                    break;
                };
                let message = match manager.delete_wallet(&address).await {
                    Ok(true) => "Wallet deleted successfully".to_string(),
                    Ok(false) => "Wallet not found".to_string(),
                    Err(e) => format!("Failed to delete wallet: {e}"),
                };
                writeln(&mut output, &message).await?;
            }
            "4" => {
                writeln(&mut output, "Exiting...").await?;
                break;
            }
            _ => writeln(&mut output, "Invalid choice").await?,
        }
    }

    output.flush().await
}

/// Print `message` and read one trimmed line; `None` at end of input
async fn prompt<R, W>(input: &mut R, output: &mut W, message: &str) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    output.write_all(message.as_bytes()).await?;
    output.flush().await?;

    let mut line = String::new();
    if input.read_line(&mut line).await? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

async fn writeln<W: AsyncWrite + Unpin>(output: &mut W, line: &str) -> std::io::Result<()> {
    output.write_all(line.as_bytes()).await?;
    output.write_all(b"\n").await
}
