//! Transaction builder for withdrawal finalizations

use anyhow::Result;
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    signature::Keypair,
    signer::Signer,
    transaction::Transaction,
};

/// Build a finalize-withdrawal instruction.
///
/// Finalization is permissionless; the payout goes to the recorded
/// owner, so the keeper can crank any matured request. Token-leg
/// accounts (program vault and the owner's token account) follow the
/// ledger account in production transactions.
pub fn build_finalize_instruction(
    token_program: &Pubkey,
    user_account: &Pubkey,
) -> Instruction {
    // Instruction discriminator for FinalizeWithdrawal
    let discriminator = 5u8;

    let data = vec![discriminator];

    let accounts = vec![
        AccountMeta::new(*user_account, false),
        // In production, would include the vault token account, the
        // owner's token account, and the token program
    ];

    Instruction {
        program_id: *token_program,
        accounts,
        data,
    }
}

/// Build a signed finalization transaction
pub fn build_finalize_transaction(
    token_program: &Pubkey,
    user_account: &Pubkey,
    keeper: &Keypair,
    recent_blockhash: solana_sdk::hash::Hash,
) -> Result<Transaction> {
    let instruction = build_finalize_instruction(token_program, user_account);

    let transaction = Transaction::new_signed_with_payer(
        &[instruction],
        Some(&keeper.pubkey()),
        &[keeper],
        recent_blockhash,
    );

    Ok(transaction)
}
