mod dispatch;
mod select;
mod update;
