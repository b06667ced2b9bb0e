//! Memo program: free-form text, here always a packed base64 memo.

use super::MEMO_PROGRAM;
use crate::errors::LedgerError;
use crate::instruction::Instruction;
use crate::memo::Memo;

/// Memo instruction carrying the base64 text of a packed memo.
pub fn memo_instruction(memo: &Memo) -> Instruction {
    text_instruction(&memo.to_base64())
}

/// Memo instruction carrying arbitrary text.
pub fn text_instruction(text: &str) -> Instruction {
    Instruction::new(MEMO_PROGRAM, Vec::new(), text.as_bytes().to_vec())
}

/// Extracts the packed memo from a memo instruction.
pub fn parse_memo(ix: &Instruction) -> Result<Memo, LedgerError> {
    if ix.program != MEMO_PROGRAM {
        return Err(LedgerError::InvalidInstruction);
    }
    let text = std::str::from_utf8(&ix.data).map_err(|_| LedgerError::InvalidMemo)?;
    Memo::from_base64(text)
}
