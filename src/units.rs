#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct RowsCount(pub usize);
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct ColumnsCount(pub usize);

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct NodesCount(pub usize);
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct EdgesCount(pub usize);

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Width(pub u32);
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Height(pub u32);
