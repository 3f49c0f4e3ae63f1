use thiserror::Error;

use crate::ir::{BlockId, InstId, IrType, ParamId};

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Errors only originate from the IR layer: building functions, rewriting uses, erasing
/// instructions and verifying structural invariants. The constant folding pass itself
/// never fails on a well-formed function; division by zero is folded into a poison value
/// instead of being reported.
///
/// # Error Categories
///
/// ## Structural Errors
/// - [`Error::Malformed`] - Internal inconsistency with source location
/// - [`Error::InvalidBlock`] - Reference to a block that does not exist
/// - [`Error::InvalidInstruction`] - Reference to an erased or unknown instruction
/// - [`Error::InvalidParam`] - Reference to a parameter the function does not declare
/// - [`Error::Verification`] - A function failed [`crate::ir::verify`]
///
/// ## Type Errors
/// - [`Error::InvalidWidth`] - Integer width outside `1..=MAX_INT_WIDTH`
/// - [`Error::TypeMismatch`] - Operand type differs from what the instruction requires
///
/// ## Builder and Rewriting Errors
/// - [`Error::InstructionInUse`] - Erasing an instruction that still has users
/// - [`Error::BlockTerminated`] - Appending past a block terminator
/// - [`Error::NoInsertionPoint`] - Building without a positioned builder
/// - [`Error::DuplicateFunction`] - Defining a function name twice in a module
///
/// # Examples
///
/// ```rust
/// use ssafold::{Error, ir::{Function, FunctionType, IrType}};
///
/// let mut function = Function::new("f", FunctionType::new(vec![], IrType::Void));
/// let entry = function.add_block("entry");
/// let ret = function.append_instruction(
///     entry,
///     ssafold::ir::InstKind::Ret { value: None },
///     IrType::Void,
///     None,
/// )?;
///
/// match function.erase_instruction(ret) {
///     Ok(_) => println!("erased"),
///     Err(Error::InstructionInUse { inst, users }) => {
///         eprintln!("{inst} still has {users} users");
///     }
///     Err(e) => eprintln!("Other error: {e}"),
/// }
/// # Ok::<(), ssafold::Error>(())
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The IR is internally inconsistent.
    ///
    /// The error includes the source location where the inconsistency was detected
    /// for debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A block identifier does not name a block of the function.
    #[error("Unknown basic block {0}")]
    InvalidBlock(BlockId),

    /// An instruction identifier names an erased or never-allocated instruction.
    #[error("Unknown or erased instruction {0}")]
    InvalidInstruction(InstId),

    /// A parameter identifier is out of range for the function signature.
    #[error("Unknown function parameter {0}")]
    InvalidParam(ParamId),

    /// An integer type was requested with an unsupported bit width.
    ///
    /// Valid widths are `1..=`[`crate::ir::MAX_INT_WIDTH`].
    #[error("Invalid integer width {0}")]
    InvalidWidth(u32),

    /// An operand does not have the type the instruction requires.
    #[error("Type mismatch - expected {expected}, found {found}")]
    TypeMismatch {
        /// The type the instruction requires
        expected: IrType,
        /// The type the operand actually has
        found: IrType,
    },

    /// Attempted to erase an instruction whose result is still referenced.
    ///
    /// Callers must redirect all uses with
    /// [`crate::ir::Function::replace_all_uses_with`] before erasing.
    #[error("Instruction {inst} still has {users} users")]
    InstructionInUse {
        /// The instruction that was about to be erased
        inst: InstId,
        /// Number of instructions still using its result
        users: usize,
    },

    /// Attempted to append an instruction after the terminator of a block.
    #[error("Block {0} already ends with a terminator")]
    BlockTerminated(BlockId),

    /// A block does not end with a terminator instruction.
    #[error("Block {0} does not end with a terminator")]
    MissingTerminator(BlockId),

    /// The builder has not been positioned in a block.
    #[error("Builder has no insertion point")]
    NoInsertionPoint,

    /// A module already contains a function with this name.
    #[error("Function '{0}' is already defined")]
    DuplicateFunction(String),

    /// The function failed structural verification.
    #[error("Verification failed: {0}")]
    Verification(String),
}
