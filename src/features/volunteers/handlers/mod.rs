pub mod volunteer_handler;

pub use volunteer_handler::{
    __path_block_movement, __path_join_movement, __path_list_active_movements,
    __path_start_movement, __path_unblock_movement, block_movement, join_movement,
    list_active_movements, start_movement, unblock_movement,
};
